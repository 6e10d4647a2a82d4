//! Telemetry errors.

use thiserror::Error;

/// A subscriber could not be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Bad filter directives, or a global subscriber is already set.
    #[error("logging setup failed: {0}")]
    LoggingInit(String),
}
