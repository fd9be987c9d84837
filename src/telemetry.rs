//! `tracing` subscriber installation.
//!
//! Services emit structured events through `tracing`; embedding binaries call
//! [`init_tracing`] once at start-up to route them to stderr.

use crate::config::OrgworkConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error returned when the global subscriber cannot be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter from `RUST_LOG`, falling back to the configured directive.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `RUST_LOG` is unset and the
/// configured directive does not parse.
pub fn env_filter(config: &OrgworkConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.log_filter).map_err(|err| TelemetryError::InvalidFilter {
            filter: config.log_filter.clone(),
            message: err.to_string(),
        })
    })
}

/// Installs a formatted subscriber as the global default.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(config: &OrgworkConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}
