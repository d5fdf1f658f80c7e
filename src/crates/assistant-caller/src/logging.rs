//! Logging setup for hosts that do not install their own subscriber.
//!
//! The filter comes from the caller only. Environment variables such as
//! `RUST_LOG` are not consulted; a host that wants them reads them itself and
//! passes the directives in.

use tracing_subscriber::EnvFilter;

/// Filter used when the supplied directives cannot be parsed.
pub const DEFAULT_FILTER: &str = "assistant_caller=info";

/// Parse `directives`, falling back to [`DEFAULT_FILTER`] when they are invalid.
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a fmt subscriber filtered by `directives`.
///
/// Returns false if a global subscriber was already set.
pub fn init_logging(directives: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives))
        .with_target(true)
        .try_init()
        .is_ok()
}
