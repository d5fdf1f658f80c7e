//! Configuration for the invocation adapter.

use crate::error::{CallerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base URL of the assistant service.
pub const DEFAULT_BASE_URL: &str = "https://api.dingtalk.com";

/// Instructions sent when the caller does not supply any.
pub const DEFAULT_INSTRUCTIONS: &str = "\
Answer the question using the knowledge available to you and cite your sources.
1. Give citations for every paragraph of the answer, placed at the end of the paragraph they support.
2. Format each citation as a clickable pair: the source title followed by its link in square brackets, for example \"Refund policy [https://example.com/refunds]\".
3. When a paragraph has several citations, list them in order of relevance, most relevant first.";

/// Configuration for [`InvocationAdapter`](crate::InvocationAdapter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerConfig {
    /// Base URL for the assistant API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for the single remote call.
    ///
    /// Defaults to 30 seconds. The call is never retried.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Instructions used when a call omits them.
    #[serde(default = "default_instructions")]
    pub default_instructions: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            default_instructions: default_instructions(),
        }
    }
}

impl CallerConfig {
    /// Create a configuration with the default endpoint, timeout and instructions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document supplied by the host.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CallerError::Configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default instructions template.
    pub fn with_default_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.default_instructions = instructions.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(CallerError::Configuration(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(CallerError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.default_instructions.trim().is_empty() {
            return Err(CallerError::Configuration(
                "default_instructions must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Join a path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}
