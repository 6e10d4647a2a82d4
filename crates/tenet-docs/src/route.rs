//! Per-operation documentation.

use crate::schema::DocSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterIn {
    /// Query string parameter.
    Query,
    /// Request body.
    Body,
    /// Header parameter.
    Header,
    /// Path parameter.
    Path,
    /// Form field (urlencoded or multipart).
    FormData,
}

impl ParameterIn {
    /// Wire name of the location.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
            Self::Header => "header",
            Self::Path => "path",
            Self::FormData => "formData",
        }
    }
}

/// One documented parameter.
///
/// Body parameters nest their schema under `schema`; every other location
/// flattens the schema's keys next to `name`/`in`. The flattened fragment
/// must not carry its own `description` or `required`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDoc {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Nested schema (body parameters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<DocSchema>,
    /// Inline schema (every other location).
    #[serde(flatten)]
    pub inline: DocSchema,
}

/// One documented response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDoc {
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Response body schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<DocSchema>,
}

/// Documentation for one `(path, verb)` operation.
///
/// Contributors take a `RouteDocument` and return the updated value, so
/// every method here consumes and returns `self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    /// Tags for grouping.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Operation ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Accepted request content types.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Produced response content types.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Parameters, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDoc>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, ResponseDoc>,
    /// Whether deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Security requirements.
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
}

impl Default for RouteDocument {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            summary: String::new(),
            description: String::new(),
            operation_id: None,
            consumes: vec!["application/json".to_string()],
            produces: vec!["application/json".to_string()],
            parameters: Vec::new(),
            responses: IndexMap::new(),
            deprecated: false,
            security: Vec::new(),
        }
    }
}

impl RouteDocument {
    /// Set the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag, keeping tags unique.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Set the operation ID.
    #[must_use]
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Replace the accepted content types.
    #[must_use]
    pub fn with_consumes<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the produced content types.
    #[must_use]
    pub fn with_produces<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = types.into_iter().map(Into::into).collect();
        self
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDoc) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the response for a status code, replacing any earlier one.
    #[must_use]
    pub fn with_response(mut self, status: u16, response: ResponseDoc) -> Self {
        self.responses.insert(status.to_string(), response);
        self
    }

    /// Mark as deprecated.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Append a security requirement.
    #[must_use]
    pub fn with_security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.push(requirement);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DocType, Required};
    use serde_json::json;

    #[test]
    fn test_default_fragment() {
        let value = serde_json::to_value(RouteDocument::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "tags": [],
                "summary": "",
                "description": "",
                "consumes": ["application/json"],
                "produces": ["application/json"],
                "responses": {},
                "security": []
            })
        );
    }

    #[test]
    fn test_inline_parameter_flattens_schema() {
        let parameter = ParameterDoc {
            name: "limit".to_string(),
            location: ParameterIn::Query,
            description: "page size".to_string(),
            required: false,
            schema: None,
            inline: DocSchema {
                maximum: Some(100.0),
                ..DocSchema::typed(DocType::Integer)
            },
        };

        let value = serde_json::to_value(&parameter).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "limit",
                "in": "query",
                "description": "page size",
                "required": false,
                "type": "integer",
                "maximum": 100.0
            })
        );
    }

    #[test]
    fn test_body_parameter_nests_schema() {
        let mut schema = DocSchema::reference("User");
        schema.required = Some(Required::Flag(true));

        let parameter = ParameterDoc {
            name: "user".to_string(),
            location: ParameterIn::Body,
            description: String::new(),
            required: true,
            schema: Some(schema),
            inline: DocSchema::default(),
        };

        let value = serde_json::to_value(&parameter).unwrap();
        assert_eq!(value["in"], "body");
        assert_eq!(value["schema"]["$ref"], "#/definitions/User");
        assert!(value.get("type").is_none());
    }

    #[test]
    fn test_parameter_round_trip() {
        let raw = json!({
            "name": "id",
            "in": "path",
            "description": "",
            "required": true,
            "type": "string",
            "pattern": "^[0-9]+$"
        });

        let parameter: ParameterDoc = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parameter.location, ParameterIn::Path);
        assert_eq!(parameter.inline.pattern.as_deref(), Some("^[0-9]+$"));
        assert_eq!(serde_json::to_value(&parameter).unwrap(), raw);
    }

    #[test]
    fn test_builder_methods() {
        let doc = RouteDocument::default()
            .with_summary("List users")
            .with_tag("users")
            .with_tag("users")
            .with_operation_id("listUsers")
            .with_consumes(["multipart/form-data"])
            .with_response(
                200,
                ResponseDoc {
                    description: "ok".to_string(),
                    schema: None,
                },
            )
            .deprecated();

        assert_eq!(doc.tags, vec!["users".to_string()]);
        assert_eq!(doc.consumes, vec!["multipart/form-data".to_string()]);
        assert!(doc.responses.contains_key("200"));
        assert!(doc.deprecated);
        assert_eq!(doc.operation_id.as_deref(), Some("listUsers"));
    }

    #[test]
    fn test_form_data_location_name() {
        assert_eq!(
            serde_json::to_value(ParameterIn::FormData).unwrap(),
            json!("formData")
        );
        assert_eq!(ParameterIn::FormData.as_str(), "formData");
    }
}
