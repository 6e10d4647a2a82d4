//! # Tenet Config
//!
//! API configuration for Tenet: document metadata, base path, tags, the
//! document route and logging.
//!
//! ## Layers
//!
//! 1. **Defaults**: `info.title = "Swagger UI"`, `info.version = "1.0.0"`,
//!    empty base path, no document route
//! 2. **File**: TOML or JSON, chosen by extension
//! 3. **Environment**: `PREFIX__SECTION__KEY` overrides
//!
//! ## File format
//!
//! ```toml
//! base_path = "/api"
//!
//! [info]
//! title = "Users API"
//! version = "2.0.0"
//! description = "Account management"
//!
//! [info.contact]
//! email = "api@example.com"
//!
//! [[tags]]
//! name = "users"
//! description = "User accounts"
//!
//! [document]
//! file_name = "swagger.json"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! ## Environment overrides
//!
//! With prefix `TENET`:
//!
//! - `TENET__BASE_PATH=/api`
//! - `TENET__INFO__TITLE="Users API"`
//! - `TENET__INFO__LICENSE__NAME=MIT`
//! - `TENET__DOCUMENT__FILE_NAME=swagger.json`
//! - `TENET__LOGGING__LEVEL=debug`
//! - `TENET__LOGGING__FORMAT=pretty`
//!
//! Unknown keys in files are rejected; unknown environment keys are ignored.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::ApiConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    ContactConfig, DocumentConfig, InfoConfig, LicenseConfig, LogFormat, LoggingConfig, TagConfig,
};
