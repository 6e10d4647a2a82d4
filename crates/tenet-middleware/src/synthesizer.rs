//! Builds validation stages from declared bindings.

use crate::stages::{RequestValidator, ResponseValidator};
use indexmap::IndexMap;
use std::sync::Arc;
use tenet_docs::ParameterIn;
use tenet_schema::{
    CompiledSchema, ParameterBinding, ResponseBinding, SchemaBridge, SchemaDescriptor,
    SchemaResolver,
};

/// Turns a handler's bindings into its request and response validators.
///
/// Every binding is compiled on its own first. A binding whose schema does
/// not compile is logged and validated as "anything goes", so one broken
/// declaration never takes the route down.
#[derive(Debug, Clone, Default)]
pub struct ValidationSynthesizer {
    bridge: SchemaBridge,
}

impl ValidationSynthesizer {
    /// A synthesizer compiling through `bridge`.
    #[must_use]
    pub fn new(bridge: SchemaBridge) -> Self {
        Self { bridge }
    }

    /// The underlying bridge.
    #[must_use]
    pub fn bridge(&self) -> &SchemaBridge {
        &self.bridge
    }

    /// Builds the request validator for `bindings`.
    ///
    /// Path and query parameters become fields of the `params` and `query`
    /// objects, `formData` parameters fields of `formData`. A body binding
    /// is the schema of `body` itself; if several are declared the last one
    /// is used.
    pub fn request_validator(
        &self,
        bindings: &[ParameterBinding],
        resolver: &dyn SchemaResolver,
    ) -> RequestValidator {
        let mut params = Vec::new();
        let mut query = Vec::new();
        let mut form_data = Vec::new();
        let mut body = None;

        for binding in bindings {
            let schema = self.checked(binding.name(), binding.effective_schema(), resolver);
            match binding.location() {
                ParameterIn::Path => params.push((binding.name().to_string(), schema)),
                ParameterIn::Query => query.push((binding.name().to_string(), schema)),
                ParameterIn::FormData => form_data.push((binding.name().to_string(), schema)),
                ParameterIn::Body => {
                    if body.is_some() {
                        tracing::warn!(
                            parameter = binding.name(),
                            "several body parameters declared; the last one wins"
                        );
                    }
                    body = Some(schema);
                }
                ParameterIn::Header => {}
            }
        }

        let form_fields = form_data.iter().map(|(name, _)| name.clone()).collect();

        let mut buckets = Vec::new();
        if !params.is_empty() {
            buckets.push(("params", SchemaDescriptor::object(params)));
        }
        if !query.is_empty() {
            buckets.push(("query", SchemaDescriptor::object(query)));
        }
        if let Some(body) = body {
            buckets.push(("body", body));
        }
        if !form_data.is_empty() {
            buckets.push(("formData", SchemaDescriptor::object(form_data)));
        }

        if buckets.is_empty() {
            return RequestValidator::pass_through();
        }

        match self.compile(&SchemaDescriptor::object(buckets), resolver) {
            Some(compiled) => RequestValidator::new(compiled, form_fields),
            None => RequestValidator::pass_through(),
        }
    }

    /// Builds the response validator for `bindings`.
    ///
    /// Bindings are keyed by status; a later binding for the same status
    /// replaces an earlier one.
    pub fn response_validator(
        &self,
        bindings: &[ResponseBinding],
        resolver: &dyn SchemaResolver,
    ) -> ResponseValidator {
        let mut schemas: IndexMap<u16, Arc<dyn CompiledSchema>> = IndexMap::new();
        for binding in bindings {
            match self.compile(binding.schema(), resolver) {
                Some(compiled) => {
                    schemas.insert(binding.status(), compiled);
                }
                None => {
                    schemas.shift_remove(&binding.status());
                }
            }
        }

        schemas
            .into_iter()
            .fold(ResponseValidator::new(), |validator, (status, schema)| {
                validator.with_status(status, schema)
            })
    }

    // Keeps `schema` if it compiles, otherwise degrades it to `any` with the
    // same presence rule and default.
    fn checked(
        &self,
        name: &str,
        schema: SchemaDescriptor,
        resolver: &dyn SchemaResolver,
    ) -> SchemaDescriptor {
        match self.bridge.to_validation(&schema, resolver) {
            Ok(_) => schema,
            Err(error) => {
                tracing::error!(
                    parameter = name,
                    engine = self.bridge.engine().name(),
                    error = %error,
                    "parameter schema failed to compile; leaving it unvalidated"
                );
                let mut any = SchemaDescriptor::any();
                any.required = schema.required;
                any.default = schema.default;
                any
            }
        }
    }

    fn compile(
        &self,
        schema: &SchemaDescriptor,
        resolver: &dyn SchemaResolver,
    ) -> Option<Arc<dyn CompiledSchema>> {
        self.bridge
            .to_validation(schema, resolver)
            .map_err(|error| {
                tracing::error!(
                    engine = self.bridge.engine().name(),
                    error = %error,
                    "schema failed to compile; leaving it unvalidated"
                );
            })
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use serde_json::json;
    use tenet_core::Context;
    use tenet_schema::{NoReferences, SchemaCatalog};

    fn synthesizer() -> ValidationSynthesizer {
        ValidationSynthesizer::default()
    }

    #[test]
    fn test_path_parameter_is_required() {
        let bindings = [
            ParameterBinding::new("name", ParameterIn::Query, SchemaDescriptor::string()),
            ParameterBinding::new("id", ParameterIn::Path, SchemaDescriptor::integer()),
        ];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut missing = Context::new(Method::GET, "/users");
        let err = validator.apply(&mut missing).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut present = Context::new(Method::GET, "/users/3");
        present.params_mut().insert("id".to_string(), json!("3"));
        validator.apply(&mut present).unwrap();
        assert_eq!(present.params().get("id"), Some(&json!(3)));
        assert!(present.query().get("name").is_none());
    }

    #[test]
    fn test_broken_schema_is_left_unvalidated() {
        let bindings = [
            ParameterBinding::new(
                "code",
                ParameterIn::Query,
                SchemaDescriptor::string().pattern("(unclosed"),
            ),
            ParameterBinding::new("page", ParameterIn::Query, SchemaDescriptor::integer()),
        ];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut ctx = Context::new(Method::GET, "/");
        ctx.query_mut().insert("code".to_string(), json!("whatever"));
        ctx.query_mut().insert("page".to_string(), json!("x"));

        let err = validator.apply(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "\"query.page\" must be a number");
    }

    #[test]
    fn test_broken_path_schema_stays_required() {
        let bindings = [ParameterBinding::new(
            "id",
            ParameterIn::Path,
            SchemaDescriptor::string().pattern("(unclosed"),
        )];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut missing = Context::new(Method::GET, "/users");
        let err = validator.apply(&mut missing).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "\"params.id\" is required");

        let mut present = Context::new(Method::GET, "/users/anything");
        present.params_mut().insert("id".to_string(), json!("anything"));
        validator.apply(&mut present).unwrap();
        assert_eq!(present.params().get("id"), Some(&json!("anything")));
    }

    #[test]
    fn test_broken_query_schema_keeps_default() {
        let bindings = [ParameterBinding::new(
            "sort",
            ParameterIn::Query,
            SchemaDescriptor::string()
                .pattern("(unclosed")
                .default_value(json!("name")),
        )];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut ctx = Context::new(Method::GET, "/users");
        validator.apply(&mut ctx).unwrap();
        assert_eq!(ctx.query().get("sort"), Some(&json!("name")));
    }

    #[test]
    fn test_last_body_binding_wins() {
        let bindings = [
            ParameterBinding::new("draft", ParameterIn::Body, SchemaDescriptor::integer()),
            ParameterBinding::new(
                "user",
                ParameterIn::Body,
                SchemaDescriptor::object([("name", SchemaDescriptor::string().required())]),
            ),
        ];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut ctx = Context::new(Method::POST, "/users").with_body(json!({ "name": "ada" }));
        validator.apply(&mut ctx).unwrap();
        assert_eq!(ctx.body(), &json!({ "name": "ada" }));
    }

    #[test]
    fn test_body_references_resolve_through_catalog() {
        let user = SchemaDescriptor::object([("name", SchemaDescriptor::string().required())])
            .id("User");
        let mut catalog = SchemaCatalog::new();
        catalog.register(&user).unwrap();

        let bindings = [ParameterBinding::new(
            "user",
            ParameterIn::Body,
            SchemaDescriptor::reference("User").required(),
        )];
        let validator = synthesizer().request_validator(&bindings, &catalog);

        let mut ctx = Context::new(Method::POST, "/users").with_body(json!({}));
        let err = validator.apply(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "\"body.name\" is required");
    }

    #[test]
    fn test_headers_only_is_pass_through() {
        let bindings = [ParameterBinding::new(
            "x-trace",
            ParameterIn::Header,
            SchemaDescriptor::string().required(),
        )];
        let validator = synthesizer().request_validator(&bindings, &NoReferences);

        let mut ctx = Context::new(Method::GET, "/");
        validator.apply(&mut ctx).unwrap();
    }

    #[test]
    fn test_last_response_binding_per_status_wins() {
        let bindings = [
            ResponseBinding::new(200, SchemaDescriptor::integer()),
            ResponseBinding::empty(204),
            ResponseBinding::new(200, SchemaDescriptor::string()),
        ];
        let validator = synthesizer().response_validator(&bindings, &NoReferences);
        assert_eq!(validator.statuses(), vec![200, 204]);

        let mut ctx = Context::new(Method::GET, "/");
        ctx.respond(StatusCode::OK, json!("text"));
        validator.check(&mut ctx).unwrap();
    }
}
