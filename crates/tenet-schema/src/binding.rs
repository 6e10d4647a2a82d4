//! Parameter and response bindings.

use crate::bridge::to_documentation;
use crate::descriptor::SchemaDescriptor;
use serde_json::json;
use tenet_docs::{Definitions, DocSchema, ParameterDoc, ParameterIn, ResponseDoc};

/// A declared request parameter.
///
/// Path parameters are always required, whatever their schema says.
///
/// # Example
///
/// ```
/// use tenet_schema::{ParameterBinding, SchemaDescriptor};
/// use tenet_docs::ParameterIn;
///
/// let id = ParameterBinding::new("id", ParameterIn::Path, SchemaDescriptor::integer());
/// assert!(id.is_required());
/// assert_eq!(id.bucket(), Some("params"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    name: String,
    location: ParameterIn,
    schema: SchemaDescriptor,
    required: bool,
}

impl ParameterBinding {
    /// Bind `schema` to the parameter `name` at `location`.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterIn, schema: SchemaDescriptor) -> Self {
        let required = location == ParameterIn::Path || schema.required;
        Self {
            name: name.into(),
            location,
            schema,
            required,
        }
    }

    /// Override the required flag. Path parameters stay required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required || self.location == ParameterIn::Path;
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter location.
    #[must_use]
    pub fn location(&self) -> ParameterIn {
        self.location
    }

    /// Declared schema.
    #[must_use]
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Whether the parameter must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The schema with the binding's required flag applied.
    #[must_use]
    pub fn effective_schema(&self) -> SchemaDescriptor {
        let mut schema = self.schema.clone();
        schema.required = self.required;
        schema
    }

    /// Key of the request bucket this parameter is validated in.
    ///
    /// Headers are documented but not validated.
    #[must_use]
    pub fn bucket(&self) -> Option<&'static str> {
        match self.location {
            ParameterIn::Path => Some("params"),
            ParameterIn::Query => Some("query"),
            ParameterIn::Body => Some("body"),
            ParameterIn::FormData => Some("formData"),
            ParameterIn::Header => None,
        }
    }

    /// Documentation entry, filing referenced schemas into `definitions`.
    pub fn to_doc(&self, definitions: &mut Definitions) -> ParameterDoc {
        let mut fragment = to_documentation(&self.schema, definitions);
        let description = fragment.take_description().unwrap_or_default();

        let (schema, inline) = if self.location == ParameterIn::Body {
            (Some(fragment), DocSchema::default())
        } else {
            // `required` is a parameter-level key for inline parameters
            fragment.required = None;
            (None, fragment)
        };

        ParameterDoc {
            name: self.name.clone(),
            location: self.location,
            description,
            required: self.required,
            schema,
            inline,
        }
    }
}

/// A declared response for one status code.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBinding {
    status: u16,
    schema: SchemaDescriptor,
}

impl ResponseBinding {
    /// Bind `schema` to `status`.
    #[must_use]
    pub fn new(status: u16, schema: SchemaDescriptor) -> Self {
        Self { status, schema }
    }

    /// A response with no declared body: an optional string defaulting to
    /// the empty string.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(
            status,
            SchemaDescriptor::string()
                .allow_empty()
                .default_value(json!("")),
        )
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Declared schema.
    #[must_use]
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Documentation entry, filing referenced schemas into `definitions`.
    pub fn to_doc(&self, definitions: &mut Definitions) -> ResponseDoc {
        let mut fragment = to_documentation(&self.schema, definitions);
        let description = fragment.take_description().unwrap_or_default();
        ResponseDoc {
            description,
            schema: Some(fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> SchemaDescriptor {
        SchemaDescriptor::object([("id", SchemaDescriptor::integer())])
            .id("User")
            .description("The user to create")
            .required()
    }

    #[test]
    fn test_path_parameters_are_forced_required() {
        let binding = ParameterBinding::new("id", ParameterIn::Path, SchemaDescriptor::string());
        assert!(binding.is_required());
        assert!(binding.effective_schema().required);
        assert!(binding.with_required(false).is_required());
    }

    #[test]
    fn test_query_parameters_follow_schema() {
        let optional = ParameterBinding::new("q", ParameterIn::Query, SchemaDescriptor::string());
        assert!(!optional.is_required());

        let required = ParameterBinding::new(
            "q",
            ParameterIn::Query,
            SchemaDescriptor::string().required(),
        );
        assert!(required.is_required());
        assert!(!required.with_required(false).effective_schema().required);
    }

    #[test]
    fn test_header_has_no_bucket() {
        let binding = ParameterBinding::new(
            "x-trace",
            ParameterIn::Header,
            SchemaDescriptor::string(),
        );
        assert_eq!(binding.bucket(), None);
    }

    #[test]
    fn test_inline_parameter_doc() {
        let mut definitions = Definitions::new();
        let binding = ParameterBinding::new(
            "limit",
            ParameterIn::Query,
            SchemaDescriptor::integer().max(50.0).description("Page size"),
        );

        let value = serde_json::to_value(binding.to_doc(&mut definitions)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "limit",
                "in": "query",
                "description": "Page size",
                "required": false,
                "type": "integer",
                "maximum": 50.0
            })
        );
    }

    #[test]
    fn test_body_parameter_doc_references_definition() {
        let mut definitions = Definitions::new();
        let binding = ParameterBinding::new("user", ParameterIn::Body, user());

        let value = serde_json::to_value(binding.to_doc(&mut definitions)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "user",
                "in": "body",
                "description": "The user to create",
                "required": true,
                "schema": { "$ref": "#/definitions/User", "required": true }
            })
        );
        assert!(definitions.contains("User"));
    }

    #[test]
    fn test_response_doc_lifts_description() {
        let mut definitions = Definitions::new();
        let binding = ResponseBinding::new(
            201,
            SchemaDescriptor::object([("id", SchemaDescriptor::integer())])
                .description("Created"),
        );

        let doc = binding.to_doc(&mut definitions);
        assert_eq!(doc.description, "Created");
        assert!(doc.schema.unwrap().description.is_none());
    }

    #[test]
    fn test_empty_response_defaults_to_empty_string() {
        let binding = ResponseBinding::empty(204);
        assert_eq!(binding.status(), 204);
        assert_eq!(binding.schema().default, Some(json!("")));
    }
}
