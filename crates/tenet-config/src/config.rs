//! The root configuration type.

use serde::{Deserialize, Serialize};
use tenet_docs::ApiDocument;

use crate::{ConfigError, DocumentConfig, InfoConfig, LogFormat, LoggingConfig, TagConfig};

/// API configuration, consumed once when the router is built.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use tenet_config::ApiConfig;
///
/// let config = ApiConfig::default();
/// assert_eq!(config.info.title, "Swagger UI");
/// assert_eq!(config.base_path, "");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Document metadata.
    #[serde(default)]
    pub info: InfoConfig,

    /// Path every route is mounted under (e.g. `/api`). Empty for none.
    #[serde(default)]
    pub base_path: String,

    /// Tag descriptions.
    #[serde(default)]
    pub tags: Vec<TagConfig>,

    /// Document serving.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Defaults with human-readable debug logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Defaults with JSON logging.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Set the title and version.
    #[must_use]
    pub fn with_info(mut self, title: impl Into<String>, version: impl Into<String>) -> Self {
        self.info.title = title.into();
        self.info.version = version.into();
        self
    }

    /// Set the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Serve the document at `base_path/file_name`.
    #[must_use]
    pub fn with_document_file(mut self, file_name: impl Into<String>) -> Self {
        self.document.file_name = Some(file_name.into());
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - the base path is not empty and does not start with `/`
    /// - the base path ends with `/`
    /// - the title or version is empty
    /// - the document file name is empty or contains `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty() {
            if !self.base_path.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    "base_path",
                    format!("must start with '/': {}", self.base_path),
                ));
            }
            if self.base_path.ends_with('/') {
                return Err(ConfigError::invalid_value(
                    "base_path",
                    format!("must not end with '/': {}", self.base_path),
                ));
            }
        }

        if self.info.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("info.title", "must not be empty"));
        }
        if self.info.version.trim().is_empty() {
            return Err(ConfigError::invalid_value("info.version", "must not be empty"));
        }

        if let Some(file_name) = &self.document.file_name {
            if file_name.is_empty() || file_name.contains('/') {
                return Err(ConfigError::invalid_value(
                    "document.file_name",
                    format!("must be a bare file name: {file_name:?}"),
                ));
            }
        }

        Ok(())
    }

    /// An empty document carrying this configuration's metadata.
    #[must_use]
    pub fn document_skeleton(&self) -> ApiDocument {
        let mut doc = ApiDocument::new(self.info.to_info()).with_base_path(self.base_path.clone());
        for tag in &self.tags {
            doc = doc.with_tag(tag.to_tag());
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_rules() {
        assert!(ApiConfig::default().with_base_path("/api").validate().is_ok());
        assert!(ApiConfig::default().with_base_path("api").validate().is_err());
        assert!(ApiConfig::default().with_base_path("/api/").validate().is_err());
        assert!(ApiConfig::default().with_base_path("/").validate().is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = ApiConfig::default().with_info(" ", "1.0").validate().unwrap_err();
        assert!(err.to_string().contains("info.title"));
    }

    #[test]
    fn test_document_file_must_be_bare() {
        assert!(ApiConfig::default()
            .with_document_file("swagger.json")
            .validate()
            .is_ok());
        assert!(ApiConfig::default()
            .with_document_file("docs/swagger.json")
            .validate()
            .is_err());
    }

    #[test]
    fn test_document_skeleton() {
        let config = ApiConfig {
            tags: vec![TagConfig {
                name: "users".to_string(),
                description: None,
            }],
            ..ApiConfig::default().with_info("Users", "2.0.0").with_base_path("/api")
        };

        let doc = config.document_skeleton();
        assert_eq!(doc.swagger, "2.0");
        assert_eq!(doc.info.title, "Users");
        assert_eq!(doc.base_path, "/api");
        assert_eq!(doc.tags.len(), 1);
        assert!(doc.paths.is_empty());
        assert!(doc.definitions.is_empty());
    }

    #[test]
    fn test_development_preset() {
        let config = ApiConfig::development();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(ApiConfig::production(), ApiConfig::default());
    }
}
