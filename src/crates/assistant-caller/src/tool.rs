//! Tool surface exposed to the host runtime.
//!
//! The host hands over named parameters as a JSON object and expects a text
//! outcome back. Parameter labels and localized descriptions live in the
//! host's tool manifest.

use crate::adapter::InvocationAdapter;
use crate::error::{CallerError, Result};
use crate::request::AssistantQuery;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the `query` parameter.
pub const QUERY_PARAM: &str = "query";
/// Name of the `instructions` parameter.
pub const INSTRUCTIONS_PARAM: &str = "instructions";

/// Outcome of a tool invocation as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// True if the assistant answered.
    pub ok: bool,

    /// The answer, or the error message.
    pub text: String,

    /// Canonical error code when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ToolOutput {
    /// Successful output.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
            error_code: None,
        }
    }

    /// Failed output.
    pub fn failure(error: &CallerError) -> Self {
        Self {
            ok: false,
            text: error.to_string(),
            error_code: Some(error.error_code().to_string()),
        }
    }
}

impl From<Result<String>> for ToolOutput {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(e) => Self::failure(&e),
        }
    }
}

/// The assistant caller as a host tool.
#[derive(Debug, Clone)]
pub struct AssistantCallerTool {
    adapter: InvocationAdapter,
}

impl AssistantCallerTool {
    /// Tool identifier registered with the host.
    pub const NAME: &'static str = "assistant_caller";

    /// Wrap an adapter.
    pub fn new(adapter: InvocationAdapter) -> Self {
        Self { adapter }
    }

    /// Read the tool parameters into a query.
    pub fn parse_args(args: &Map<String, Value>) -> Result<AssistantQuery> {
        let query = match args.get(QUERY_PARAM) {
            Some(Value::String(q)) => q.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => {
                return Err(CallerError::Validation(format!(
                    "Parameter {} must be a string, got {}",
                    QUERY_PARAM, other
                )))
            }
        };

        let instructions = match args.get(INSTRUCTIONS_PARAM) {
            Some(Value::String(i)) => Some(i.clone()),
            None | Some(Value::Null) => None,
            Some(other) => {
                return Err(CallerError::Validation(format!(
                    "Parameter {} must be a string, got {}",
                    INSTRUCTIONS_PARAM, other
                )))
            }
        };

        Ok(AssistantQuery {
            query,
            instructions,
        })
    }

    /// Run the tool.
    pub async fn invoke(&self, args: &Map<String, Value>) -> ToolOutput {
        let result = match Self::parse_args(args) {
            Ok(query) => self.adapter.call_query(&query).await,
            Err(e) => Err(e),
        };
        result.into()
    }
}
