//! The aggregated API document.

use crate::error::DocsResult;
use crate::route::RouteDocument;
use crate::schema::Definitions;
use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Swagger 2.0 document.
///
/// Built once during route compilation and served verbatim afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    /// Swagger version, always `"2.0"`.
    pub swagger: String,
    /// API metadata.
    pub info: Info,
    /// Base path every route is mounted under.
    #[serde(default)]
    pub base_path: String,
    /// Tag descriptions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Path (relative to the base path) to verb to operation.
    #[serde(default)]
    pub paths: IndexMap<String, IndexMap<String, RouteDocument>>,
    /// Shared schema definitions.
    #[serde(default)]
    pub definitions: Definitions,
}

impl Default for ApiDocument {
    fn default() -> Self {
        Self::new(Info::default())
    }
}

impl ApiDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            swagger: "2.0".to_string(),
            info,
            base_path: String::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
            definitions: Definitions::new(),
        }
    }

    /// Set the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Add a tag description.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Record an operation, returning the one it replaced.
    pub fn record_route(
        &mut self,
        path: impl Into<String>,
        verb: impl Into<String>,
        route: RouteDocument,
    ) -> Option<RouteDocument> {
        self.paths
            .entry(path.into())
            .or_default()
            .insert(verb.into(), route)
    }

    /// Look up an operation.
    #[must_use]
    pub fn route(&self, path: &str, verb: &str) -> Option<&RouteDocument> {
        self.paths.get(path).and_then(|verbs| verbs.get(verb))
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to a JSON body.
    pub fn to_bytes(&self) -> DocsResult<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms of service URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// Contact information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Default for Info {
    fn default() -> Self {
        Self::new("Swagger UI", "1.0.0")
    }
}

impl Info {
    /// Create metadata with a title and version.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License name.
    pub name: String,
    /// License URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tag description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            external_docs: None,
        }
    }
}

/// External documentation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    /// URL.
    pub url: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
