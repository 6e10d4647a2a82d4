//! The library-agnostic schema description.

use indexmap::IndexMap;
use serde_json::Value;
use tenet_docs::DocType;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// Any JSON number.
    Number,
    /// Whole number.
    Integer,
    /// Boolean.
    Boolean,
    /// Uploaded file (form data only).
    File,
    /// Anything, unconstrained.
    Any,
}

impl PrimitiveKind {
    /// Documentation type, `None` for [`PrimitiveKind::Any`].
    #[must_use]
    pub const fn doc_type(&self) -> Option<DocType> {
        match self {
            Self::String => Some(DocType::String),
            Self::Number => Some(DocType::Number),
            Self::Integer => Some(DocType::Integer),
            Self::Boolean => Some(DocType::Boolean),
            Self::File => Some(DocType::File),
            Self::Any => None,
        }
    }
}

/// Shape of a [`SchemaDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// An object with ordered fields. No fields means any keys are accepted.
    Object(IndexMap<String, SchemaDescriptor>),
    /// An array. `None` items is a malformed declaration.
    Array(Option<Box<SchemaDescriptor>>),
    /// A reference to a catalogued schema id.
    Reference(String),
}

/// Value constraints shared by every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Inclusive lower bound for numbers.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numbers.
    pub maximum: Option<f64>,
    /// Minimum string length in characters.
    pub min_length: Option<u64>,
    /// Maximum string length in characters.
    pub max_length: Option<u64>,
    /// Regex strings must match.
    pub pattern: Option<String>,
    /// Whether the empty string is accepted.
    pub allow_empty: bool,
    /// Exhaustive list of accepted values.
    pub valid: Vec<Value>,
}

/// Describes a data shape once, for both validation and documentation.
///
/// Objects and arrays meant to be reused in documentation carry an `id`;
/// they are emitted as `#/definitions/{id}` references.
///
/// # Example
///
/// ```
/// use tenet_schema::SchemaDescriptor;
///
/// let user = SchemaDescriptor::object([
///     ("id", SchemaDescriptor::integer().required()),
///     ("name", SchemaDescriptor::string().min_length(1)),
/// ])
/// .id("User")
/// .description("A registered user");
///
/// assert_eq!(user.id.as_deref(), Some("User"));
/// assert!(user.field("id").unwrap().required);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    /// Shape.
    pub kind: SchemaKind,
    /// Stable id for documentation reuse.
    pub id: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the value must be present.
    pub required: bool,
    /// Value used when absent.
    pub default: Option<Value>,
    /// Example value (documentation only).
    pub example: Option<Value>,
    /// Format hint (documentation only).
    pub format: Option<String>,
    /// Value constraints.
    pub constraints: Constraints,
}

impl SchemaDescriptor {
    /// Descriptor of the given kind with no flags.
    #[must_use]
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            id: None,
            description: None,
            required: false,
            default: None,
            example: None,
            format: None,
            constraints: Constraints::default(),
        }
    }

    /// Primitive descriptor.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(SchemaKind::Primitive(kind))
    }

    /// String descriptor.
    #[must_use]
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Number descriptor.
    #[must_use]
    pub fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    /// Integer descriptor.
    #[must_use]
    pub fn integer() -> Self {
        Self::primitive(PrimitiveKind::Integer)
    }

    /// Boolean descriptor.
    #[must_use]
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    /// File descriptor.
    #[must_use]
    pub fn file() -> Self {
        Self::primitive(PrimitiveKind::File)
    }

    /// Unconstrained descriptor.
    #[must_use]
    pub fn any() -> Self {
        Self::primitive(PrimitiveKind::Any)
    }

    /// Object descriptor with fields in the given order.
    #[must_use]
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaDescriptor)>,
        K: Into<String>,
    {
        Self::new(SchemaKind::Object(
            fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        ))
    }

    /// Array descriptor.
    #[must_use]
    pub fn array(items: SchemaDescriptor) -> Self {
        Self::new(SchemaKind::Array(Some(Box::new(items))))
    }

    /// Reference to a catalogued schema.
    #[must_use]
    pub fn reference(id: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(id.into()))
    }

    /// Set the id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the example value.
    #[must_use]
    pub fn example(mut self, value: Value) -> Self {
        self.example = Some(value);
        self
    }

    /// Set the format hint.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn min(mut self, minimum: f64) -> Self {
        self.constraints.minimum = Some(minimum);
        self
    }

    /// Inclusive upper bound.
    #[must_use]
    pub fn max(mut self, maximum: f64) -> Self {
        self.constraints.maximum = Some(maximum);
        self
    }

    /// Minimum length.
    #[must_use]
    pub fn min_length(mut self, length: u64) -> Self {
        self.constraints.min_length = Some(length);
        self
    }

    /// Maximum length.
    #[must_use]
    pub fn max_length(mut self, length: u64) -> Self {
        self.constraints.max_length = Some(length);
        self
    }

    /// Regex the value must match.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    /// Accept the empty string.
    #[must_use]
    pub fn allow_empty(mut self) -> Self {
        self.constraints.allow_empty = true;
        self
    }

    /// Restrict to the given values.
    #[must_use]
    pub fn valid<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.constraints.valid = values.into_iter().collect();
        self
    }

    /// Field of an object descriptor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaDescriptor> {
        match &self.kind {
            SchemaKind::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Fields of an object descriptor, empty for every other kind.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &SchemaDescriptor)> {
        let fields = match &self.kind {
            SchemaKind::Object(fields) => Some(fields),
            _ => None,
        };
        fields.into_iter().flatten()
    }

    /// Item descriptor of an array.
    #[must_use]
    pub fn items(&self) -> Option<&SchemaDescriptor> {
        match &self.kind {
            SchemaKind::Array(items) => items.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for objects and arrays carrying an id.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.id.is_some() && matches!(self.kind, SchemaKind::Object(_) | SchemaKind::Array(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_keeps_field_order() {
        let schema = SchemaDescriptor::object([
            ("zeta", SchemaDescriptor::string()),
            ("alpha", SchemaDescriptor::number()),
        ]);

        let names: Vec<_> = schema.fields().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_fields_of_non_object_is_empty() {
        assert_eq!(SchemaDescriptor::string().fields().count(), 0);
        assert!(SchemaDescriptor::string().field("x").is_none());
    }

    #[test]
    fn test_builder_flags() {
        let schema = SchemaDescriptor::string()
            .required()
            .min_length(2)
            .max_length(8)
            .pattern("^[a-z]+$")
            .valid([json!("ab"), json!("cd")])
            .default_value(json!("ab"));

        assert!(schema.required);
        assert_eq!(schema.constraints.min_length, Some(2));
        assert_eq!(schema.constraints.max_length, Some(8));
        assert_eq!(schema.constraints.valid.len(), 2);
        assert_eq!(schema.default, Some(json!("ab")));
        assert!(!schema.clone().optional().required);
    }

    #[test]
    fn test_is_definition() {
        assert!(SchemaDescriptor::object([("a", SchemaDescriptor::any())])
            .id("A")
            .is_definition());
        assert!(SchemaDescriptor::array(SchemaDescriptor::string())
            .id("Names")
            .is_definition());
        assert!(!SchemaDescriptor::string().id("S").is_definition());
        assert!(!SchemaDescriptor::object(Vec::<(String, _)>::new()).is_definition());
    }

    #[test]
    fn test_doc_types() {
        assert_eq!(PrimitiveKind::Integer.doc_type(), Some(DocType::Integer));
        assert_eq!(PrimitiveKind::File.doc_type(), Some(DocType::File));
        assert_eq!(PrimitiveKind::Any.doc_type(), None);
    }
}
