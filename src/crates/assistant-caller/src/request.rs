//! Request types: what the caller asks, and what goes over the wire.

use crate::error::{CallerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of the run endpoint, relative to the API base URL.
pub const RUN_PATH: &str = "/v1.0/assistant/threads/runs";

/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-acs-dingtalk-access-token";

/// A question for the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantQuery {
    /// The user's question.
    pub query: String,

    /// Behavioral instructions. `None` selects the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl AssistantQuery {
    /// Create a query without instructions.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            instructions: None,
        }
    }

    /// Set the instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Reject queries that are empty after trimming.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(CallerError::Validation(
                "Question cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The instructions to transmit: the caller's own, or `default` when they
    /// are absent or blank.
    pub fn effective_instructions<'a>(&'a self, default: &'a str) -> &'a str {
        self.instructions
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or(default)
    }
}

/// JSON body of a run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
    pub assistant_id: String,
    pub thread: ThreadPayload,
    pub instructions: String,
    pub stream: bool,
}

/// Thread created together with the run. It lives only as long as the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPayload {
    pub messages: Vec<ThreadMessage>,
}

/// A single message in the thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: String,
    pub content: String,
}

impl RunPayload {
    /// Payload asking `assistant_id` to answer `query` under `instructions`.
    pub fn new(
        assistant_id: impl Into<String>,
        query: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            thread: ThreadPayload {
                messages: vec![ThreadMessage {
                    role: "user".to_string(),
                    content: query.into(),
                }],
            },
            instructions: instructions.into(),
            stream: false,
        }
    }

    /// The user's question as transmitted.
    pub fn query(&self) -> Option<&str> {
        self.thread
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// A fully assembled request, ready for a transport.
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Target URL.
    pub url: String,
    /// Access token sent in [`ACCESS_TOKEN_HEADER`].
    pub access_token: String,
    /// JSON body.
    pub payload: RunPayload,
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("url", &self.url)
            .field("access_token", &"<redacted>")
            .field("payload", &self.payload)
            .finish()
    }
}

/// Raw transport-level response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text, possibly empty.
    pub body: String,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
