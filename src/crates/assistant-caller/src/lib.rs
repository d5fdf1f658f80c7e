//! Invocation adapter for a remote AI assistant.
//!
//! This crate forwards a natural-language query, together with optional
//! behavioral instructions, to a remote conversational-assistant service and
//! returns the assistant's answer as plain text.
//!
//! Each invocation validates its input, resolves credentials from an injected
//! [`CredentialProvider`], performs exactly one call through an injected
//! [`AssistantTransport`], and either returns the answer verbatim or a
//! classified [`CallerError`]. Nothing is cached or retried and no
//! conversation state survives the call.
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant_caller::{CallerConfig, HostContext, InvocationAdapter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = HostContext::new()
//!         .with_entry("assistant_id", "asst-123")
//!         .with_entry("access_token", "token-from-host");
//!
//!     let adapter = InvocationAdapter::http(CallerConfig::default(), Arc::new(context))?;
//!
//!     let answer = adapter.call("What is the refund policy?", None).await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## App key/secret credentials
//!
//! ```rust,ignore
//! use assistant_caller::{CallerConfig, HostContext, InvocationAdapter, TokenExchangeProvider};
//! use std::sync::Arc;
//!
//! let config = CallerConfig::default();
//! let context = HostContext::new()
//!     .with_entry("assistant_id", "asst-123")
//!     .with_entry("app_key", "ding-app-key")
//!     .with_entry("app_secret", "ding-app-secret");
//!
//! let provider = TokenExchangeProvider::new(context, &config)?;
//! let adapter = InvocationAdapter::http(config, Arc::new(provider))?;
//! let answer = adapter.call("Summarize the travel policy", Some("Answer in one sentence.")).await?;
//! ```

pub mod adapter;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod oauth;
pub mod request;
pub mod response;
pub mod tool;
pub mod transport;

// Re-export commonly used types
pub use adapter::InvocationAdapter;
pub use config::{CallerConfig, DEFAULT_INSTRUCTIONS};
pub use credentials::{AuthMaterial, CredentialProvider, Credentials, HostContext, StaticCredentials};
pub use error::{CallerError, Result, TransportErrorKind};
pub use oauth::TokenExchangeProvider;
pub use request::{AssistantQuery, OutboundRequest, RunPayload, TransportResponse};
pub use response::extract_answer;
pub use tool::{AssistantCallerTool, ToolOutput};
pub use transport::{AssistantTransport, HttpTransport};

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
