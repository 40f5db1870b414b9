//! Structured logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init_tracing`]
//! once at startup to install a `fmt` subscriber filtered by
//! [`LOG_ENV_VAR`].

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "HOMESTEAD_LOG";

/// Filter used when [`LOG_ENV_VAR`] is unset or unparsable.
pub const DEFAULT_FILTER: &str = "homestead=info";

/// Raised when a global subscriber is already installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Builds the filter from [`LOG_ENV_VAR`], falling back to `fallback`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global `fmt` subscriber.
///
/// `verbose` lowers the fallback level to `debug`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), TelemetryError> {
    let fallback = if verbose {
        "homestead=debug"
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}
