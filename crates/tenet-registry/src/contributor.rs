//! Route documentation contributors.
//!
//! A contributor takes the route's documentation fragment and returns the
//! updated fragment. Schema definitions it encounters go into the shared
//! table it is handed. Contributors run in registration order.

use std::sync::Arc;
use tenet_docs::{Definitions, RouteDocument, SecurityRequirement};
use tenet_schema::{ParameterBinding, ResponseBinding};

/// A function that updates a route's documentation.
pub type Contributor =
    Arc<dyn Fn(RouteDocument, &mut Definitions) -> RouteDocument + Send + Sync + 'static>;

/// Wraps a closure as a [`Contributor`].
///
/// ```
/// use tenet_docs::{Definitions, RouteDocument};
/// use tenet_registry::contributor;
///
/// let tag_admin = contributor::from_fn(|doc, _| doc.with_tag("admin"));
/// let doc = tag_admin(RouteDocument::default(), &mut Definitions::new());
/// assert_eq!(doc.tags, vec!["admin"]);
/// ```
pub fn from_fn<F>(f: F) -> Contributor
where
    F: Fn(RouteDocument, &mut Definitions) -> RouteDocument + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Sets the summary.
pub fn summary(summary: impl Into<String>) -> Contributor {
    let summary = summary.into();
    from_fn(move |doc, _| doc.with_summary(summary.clone()))
}

/// Sets the description.
pub fn description(description: impl Into<String>) -> Contributor {
    let description = description.into();
    from_fn(move |doc, _| doc.with_description(description.clone()))
}

/// Adds a tag.
pub fn tag(tag: impl Into<String>) -> Contributor {
    let tag = tag.into();
    from_fn(move |doc, _| doc.with_tag(tag.clone()))
}

/// Sets the operation id.
pub fn operation_id(operation_id: impl Into<String>) -> Contributor {
    let operation_id = operation_id.into();
    from_fn(move |doc, _| doc.with_operation_id(operation_id.clone()))
}

/// Replaces the accepted content types.
pub fn consumes(types: Vec<String>) -> Contributor {
    from_fn(move |doc, _| doc.with_consumes(types.clone()))
}

/// Replaces the produced content types.
pub fn produces(types: Vec<String>) -> Contributor {
    from_fn(move |doc, _| doc.with_produces(types.clone()))
}

/// Marks the route deprecated.
pub fn deprecated() -> Contributor {
    from_fn(|doc, _| doc.deprecated())
}

/// Appends a security requirement.
pub fn security(requirement: SecurityRequirement) -> Contributor {
    from_fn(move |doc, _| doc.with_security(requirement.clone()))
}

/// Documents a parameter.
pub fn parameter(binding: ParameterBinding) -> Contributor {
    from_fn(move |doc, definitions| doc.with_parameter(binding.to_doc(definitions)))
}

/// Documents a response.
pub fn response(binding: ResponseBinding) -> Contributor {
    from_fn(move |doc, definitions| doc.with_response(binding.status(), binding.to_doc(definitions)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenet_docs::ParameterIn;
    use tenet_schema::SchemaDescriptor;

    fn apply(contributors: &[Contributor], definitions: &mut Definitions) -> RouteDocument {
        let mut doc = RouteDocument::default();
        for contribute in contributors {
            doc = contribute(doc, definitions);
        }
        doc
    }

    #[test]
    fn test_contributors_compose_in_order() {
        let mut definitions = Definitions::new();
        let doc = apply(
            &[
                summary("first"),
                tag("users"),
                summary("second"),
                tag("users"),
                deprecated(),
            ],
            &mut definitions,
        );

        assert_eq!(doc.summary, "second");
        assert_eq!(doc.tags, vec!["users"]);
        assert!(doc.deprecated);
    }

    #[test]
    fn test_parameter_and_response_fill_definitions() {
        let user = SchemaDescriptor::object([("name", SchemaDescriptor::string())]).id("User");
        let mut definitions = Definitions::new();
        let doc = apply(
            &[
                parameter(ParameterBinding::new("user", ParameterIn::Body, user.clone())),
                response(ResponseBinding::new(201, user)),
            ],
            &mut definitions,
        );

        assert_eq!(doc.parameters.len(), 1);
        assert!(doc.responses.contains_key("201"));
        assert!(definitions.contains("User"));
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_content_types_and_security() {
        let mut requirement = SecurityRequirement::new();
        requirement.insert("bearer".to_string(), vec![]);

        let doc = apply(
            &[
                consumes(vec!["multipart/form-data".to_string()]),
                produces(vec!["text/plain".to_string()]),
                operation_id("uploadAvatar"),
                security(requirement),
            ],
            &mut Definitions::new(),
        );

        assert_eq!(doc.consumes, vec!["multipart/form-data"]);
        assert_eq!(doc.produces, vec!["text/plain"]);
        assert_eq!(doc.operation_id.as_deref(), Some("uploadAvatar"));
        assert_eq!(doc.security.len(), 1);
    }
}
