//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ApiConfig, ConfigError, LicenseConfig, LogFormat};

/// Builds an [`ApiConfig`] from layers, later layers overriding earlier
/// ones:
/// 1. Default values
/// 2. A configuration file or string (TOML or JSON)
/// 3. Environment variables `PREFIX__SECTION__KEY`
///
/// # Example
///
/// ```no_run
/// use tenet_config::ConfigLoader;
///
/// # fn main() -> Result<(), tenet_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("api.toml")?
///     .with_dotenv()?
///     .with_env_prefix("TENET")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: ApiConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ApiConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ApiConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format follows the extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The content does not parse or has unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) when the file is present.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `format` (`"toml"` or `"json"`).
    ///
    /// ```
    /// use tenet_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     base_path = "/api"
    ///
    ///     [info]
    ///     title = "Users"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.base_path, "/api");
    /// assert_eq!(config.info.title, "Users");
    /// assert_eq!(config.info.version, "1.0.0");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnknownFormat(format.to_string())),
        };
        Ok(self)
    }

    /// Read environment overrides with `prefix`, e.g. `TENET__INFO__TITLE`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    ///
    /// # Errors
    ///
    /// Currently infallible; a missing `.env` is not an error.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<ApiConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// The configuration as loaded so far, without environment overrides or
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ApiConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<ApiConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnknownFormat(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let overrides: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();

        for (key, value) in overrides {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let info = &mut self.config.info;

        match parts.as_slice() {
            ["BASE_PATH"] => self.config.base_path = value.to_string(),

            ["INFO", "TITLE"] => info.title = value.to_string(),
            ["INFO", "VERSION"] => info.version = value.to_string(),
            ["INFO", "DESCRIPTION"] => info.description = optional(value),
            ["INFO", "TERMS_OF_SERVICE"] => info.terms_of_service = optional(value),
            ["INFO", "CONTACT", "NAME"] => {
                info.contact.get_or_insert_with(Default::default).name = optional(value);
            }
            ["INFO", "CONTACT", "URL"] => {
                info.contact.get_or_insert_with(Default::default).url = optional(value);
            }
            ["INFO", "CONTACT", "EMAIL"] => {
                info.contact.get_or_insert_with(Default::default).email = optional(value);
            }
            ["INFO", "LICENSE", "NAME"] => {
                let url = info.license.take().and_then(|l| l.url);
                info.license = optional(value).map(|name| LicenseConfig { name, url });
            }
            ["INFO", "LICENSE", "URL"] => match info.license.as_mut() {
                Some(license) => license.url = optional(value),
                None => {
                    return Err(ConfigError::env_parse_error(
                        key,
                        "license url set without a license name",
                    ))
                }
            },

            ["DOCUMENT", "FILE_NAME"] => self.config.document.file_name = optional(value),

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => self.config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            _ => {}
        }

        Ok(())
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
