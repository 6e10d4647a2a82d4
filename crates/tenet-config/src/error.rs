//! Errors raised while loading an [`ApiConfig`](crate::ApiConfig).

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("config file {path} does not exist")]
    Missing {
        /// The file that was asked for.
        path: PathBuf,
    },

    /// A file exists but could not be read.
    #[error("cannot read config file {path}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A TOML source does not parse or does not match the schema.
    #[error("malformed TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON source does not parse or does not match the schema.
    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is unusable, e.g. a base path ending in `/`.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable holds a value of the wrong type.
    #[error("environment override {var}: {reason}")]
    Env {
        /// Variable name, prefix included.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Neither TOML nor JSON.
    #[error("cannot tell the config format of {0}; use .toml or .json")]
    UnknownFormat(String),
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// The dotted field name, for [`Invalid`](Self::Invalid) errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
