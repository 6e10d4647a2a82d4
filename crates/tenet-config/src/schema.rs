//! Configuration sections.

use serde::{Deserialize, Serialize};
use tenet_docs::{Contact, Info, License, Tag};
use tenet_telemetry::LogConfig;

/// API metadata section, rendered as the document's `info` block.
///
/// # Example
///
/// ```
/// use tenet_config::InfoConfig;
///
/// let info = InfoConfig::default();
/// assert_eq!(info.title, "Swagger UI");
/// assert_eq!(info.version, "1.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InfoConfig {
    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Terms of service URL.
    #[serde(default)]
    pub terms_of_service: Option<String>,

    /// Contact details.
    #[serde(default)]
    pub contact: Option<ContactConfig>,

    /// License.
    #[serde(default)]
    pub license: Option<LicenseConfig>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }
}

impl InfoConfig {
    /// The document `info` block.
    #[must_use]
    pub fn to_info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            terms_of_service: self.terms_of_service.clone(),
            contact: self.contact.as_ref().map(|c| Contact {
                name: c.name.clone(),
                url: c.url.clone(),
                email: c.email.clone(),
            }),
            license: self.license.as_ref().map(|l| License {
                name: l.name.clone(),
                url: l.url.clone(),
            }),
        }
    }
}

fn default_title() -> String {
    "Swagger UI".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Contact details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    /// Contact name.
    #[serde(default)]
    pub name: Option<String>,

    /// Contact URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// License.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LicenseConfig {
    /// License name.
    pub name: String,

    /// License URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// A tag description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TagConfig {
    /// Tag name, as used by routes.
    pub name: String,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

impl TagConfig {
    /// The document tag.
    #[must_use]
    pub fn to_tag(&self) -> Tag {
        Tag {
            description: self.description.clone(),
            ..Tag::new(self.name.clone())
        }
    }
}

/// Where the compiled document is served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    /// File name of the JSON document route (e.g. `swagger.json`), mounted
    /// under the base path. Unset means the document is not served.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directives (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Settings for [`tenet_telemetry::init_logging`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            file_line_info: self.include_location,
            ..base
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
