//! Documentation schema fragments and the shared definitions table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of every local definition reference.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Swagger 2.0 schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// File upload (form data only).
    File,
}

impl DocType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::File => "file",
        }
    }
}

/// The two shapes `required` takes in a Swagger document.
///
/// Structural object schemas list their required properties. Fragments that
/// sit next to a `$ref` carry a plain flag instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    /// Flag attached to a referencing fragment.
    Flag(bool),
    /// Required property names of an object schema.
    Fields(Vec<String>),
}

/// A documentation schema fragment.
///
/// A fragment referencing a definition may also carry `description` and
/// `required` next to its `$ref`. Consumers are expected to merge the three
/// keys at the same level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocSchema {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<DocType>,
    /// Schema format (e.g., "int64", "date-time").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to a definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, DocSchema>,
    /// Required properties, or the required flag of a referencing fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<DocSchema>>,
    /// Enum values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "enum")]
    pub enum_values: Vec<serde_json::Value>,
    /// Minimum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum length (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    /// Maximum length (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    /// Pattern regex (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl DocSchema {
    /// Create a schema of the given type.
    #[must_use]
    pub fn typed(schema_type: DocType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::typed(DocType::String)
    }

    /// Create an object schema with no properties.
    #[must_use]
    pub fn object() -> Self {
        Self::typed(DocType::Object)
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: DocSchema) -> Self {
        Self {
            schema_type: Some(DocType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Create a reference to a definition id.
    #[must_use]
    pub fn reference(id: &str) -> Self {
        Self {
            reference: Some(format!("{DEFINITIONS_PREFIX}{id}")),
            ..Default::default()
        }
    }

    /// Returns the referenced definition id, if this is a local reference.
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.reference.as_deref().map(|reference| {
            reference
                .strip_prefix(DEFINITIONS_PREFIX)
                .unwrap_or(reference)
        })
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: DocSchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Removes and returns the description.
    pub fn take_description(&mut self) -> Option<String> {
        self.description.take()
    }

    /// Returns `true` when a referencing fragment is flagged required.
    #[must_use]
    pub fn is_required_flag(&self) -> bool {
        matches!(self.required, Some(Required::Flag(true)))
    }

    /// Required property names of an object schema.
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        match &self.required {
            Some(Required::Fields(fields)) => fields,
            _ => &[],
        }
    }
}

/// Outcome of inserting into [`Definitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionChange {
    /// The id was new.
    Inserted,
    /// The id existed with identical content.
    Unchanged,
    /// The id existed with different content, which was overwritten.
    Replaced,
}

/// The shared definitions table (`#/definitions`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions(IndexMap<String, DocSchema>);

impl Definitions {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. The last write for an id wins.
    pub fn insert(&mut self, id: impl Into<String>, schema: DocSchema) -> DefinitionChange {
        match self.0.insert(id.into(), schema.clone()) {
            None => DefinitionChange::Inserted,
            Some(previous) if previous == schema => DefinitionChange::Unchanged,
            Some(_) => DefinitionChange::Replaced,
        }
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DocSchema> {
        self.0.get(id)
    }

    /// Returns `true` if the id is defined.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DocSchema)> {
        self.0.iter()
    }

    /// Move every definition of `other` into this table.
    pub fn absorb(&mut self, other: Definitions) -> Vec<(String, DefinitionChange)> {
        other
            .0
            .into_iter()
            .map(|(id, schema)| {
                let change = self.insert(id.clone(), schema);
                (id, change)
            })
            .collect()
    }
}
