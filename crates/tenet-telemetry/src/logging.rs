//! Structured logging.
//!
//! One fmt layer behind an `EnvFilter`, emitting JSON lines or pretty
//! multi-line records depending on [`LogConfig::json_format`].

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How and what to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Install a subscriber at all.
    pub enabled: bool,

    /// `EnvFilter` directives, e.g. `"info"` or `"tenet=debug,tenet_router=warn"`.
    pub level: String,

    /// JSON lines instead of pretty output.
    pub json_format: bool,

    /// Log span open and close, which shows each route compilation.
    pub span_events: bool,

    /// Source file and line of each event.
    pub file_line_info: bool,

    /// Module path of each event.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Pretty output at debug level, with spans and source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            include_target: true,
        }
    }

    /// JSON output at info level.
    #[must_use]
    pub fn production() -> Self {
        Self {
            json_format: true,
            level: "info".to_string(),
            span_events: false,
            file_line_info: false,
            ..Self::development()
        }
    }

    /// Replace the filter directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn layer(&self, filter: EnvFilter) -> BoxedLayer {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let fmt = tracing_subscriber::fmt::layer()
            .with_span_events(spans)
            .with_file(self.file_line_info)
            .with_line_number(self.file_line_info)
            .with_target(self.include_target);

        if self.json_format {
            fmt.json().with_filter(filter).boxed()
        } else {
            fmt.pretty().with_filter(filter).boxed()
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// A disabled config installs nothing and succeeds.
///
/// # Errors
///
/// Fails if the directives do not parse or a global subscriber is already
/// installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    tracing_subscriber::registry()
        .with(config.layer(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses filter directives into an [`EnvFilter`].
///
/// # Errors
///
/// Fails on directives `EnvFilter` rejects, such as an unknown level.
pub fn create_env_filter(directives: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| TelemetryError::LoggingInit(format!("bad log filter {directives:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let dev = LogConfig::development();
        assert!(!dev.json_format);
        assert!(dev.span_events);
        assert_eq!(dev.level, "debug");

        let prod = LogConfig::default();
        assert!(prod.json_format);
        assert!(prod.include_target);
        assert_eq!(prod, LogConfig::production());
    }

    #[test]
    fn test_env_filter_directives() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("tenet=debug,tenet_router=warn").is_ok());
        assert!(create_env_filter("tenet=loud").is_err());
    }

    #[test]
    fn test_disabled_installs_nothing() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::production().with_level("tenet=loud")
        };
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_invalid_level_is_reported() {
        let config = LogConfig::development().with_level("tenet=loud");
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("bad log filter \"tenet=loud\""));
    }
}
