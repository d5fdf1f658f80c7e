//! Error types for assistant invocations.

use std::fmt;
use thiserror::Error;

/// Result type for assistant invocations.
pub type Result<T> = std::result::Result<T, CallerError>;

/// What went wrong at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The call did not complete within the configured timeout.
    Timeout,
    /// The remote host could not be reached.
    Connect,
    /// The remote service answered with a non-success HTTP status.
    Status(u16),
    /// Any other transport failure.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connection failed"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Other => write!(f, "transport failure"),
        }
    }
}

/// Errors that can occur while calling the remote assistant.
///
/// Every variant is terminal for a single invocation. Nothing is retried
/// here; [`CallerError::is_retryable`] is only a hint for the caller.
#[derive(Debug, Error)]
pub enum CallerError {
    /// Credentials are absent or structurally invalid, or the adapter is
    /// misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller supplied invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure, timeout, or non-success status.
    #[error("Transport error ({kind}): {detail}")]
    Transport {
        /// Failure classification.
        kind: TransportErrorKind,
        /// Diagnostic detail from the transport or the response body.
        detail: String,
    },

    /// The remote service responded but reported a failure, or returned a
    /// body that is not a usable answer.
    #[error("Remote application error: {0}")]
    RemoteApplication(String),
}

impl CallerError {
    /// Build a transport error.
    pub fn transport(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            detail: detail.into(),
        }
    }

    /// Get the canonical error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "E_CONFIGURATION",
            Self::Validation(_) => "E_VALIDATION",
            Self::Transport { .. } => "E_TRANSPORT",
            Self::RemoteApplication(_) => "E_REMOTE",
        }
    }

    /// Check if a caller could reasonably retry this invocation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { kind, .. } => match kind {
                TransportErrorKind::Timeout | TransportErrorKind::Connect => true,
                TransportErrorKind::Status(code) => *code == 429 || *code >= 500,
                TransportErrorKind::Other => false,
            },
            _ => false,
        }
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for CallerError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if let Some(status) = err.status() {
            TransportErrorKind::Status(status.as_u16())
        } else {
            TransportErrorKind::Other
        };
        Self::transport(kind, err.to_string())
    }
}

impl From<serde_json::Error> for CallerError {
    fn from(err: serde_json::Error) -> Self {
        CallerError::RemoteApplication(format!("Malformed response body: {}", err))
    }
}
