//! # Tenet Telemetry
//!
//! Logging setup for services built on Tenet.
//!
//! Tenet itself only emits `tracing` events; nothing is printed until a
//! subscriber is installed. [`init_logging`] installs one:
//!
//! - JSON output with an `EnvFilter` for production
//! - pretty, human-readable output for development
//!
//! ## Example
//!
//! ```rust,no_run
//! use tenet_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! tracing::info!(controller = "users", "routes compiled");
//! ```

#![doc(html_root_url = "https://docs.rs/tenet-telemetry/0.1.0")]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
