//! Translation between descriptors, validators and documentation fragments.
//!
//! ```text
//!                    to_validation
//!   SchemaDescriptor ─────────────▶ CompiledSchema
//!        │     ▲
//!        │     │ to_internal
//!        ▼     │
//!      DocSchema (+ Definitions)
//!          to_documentation
//! ```
//!
//! Documentation generation never fails: a malformed descriptor degrades to
//! the most permissive fragment and is logged.

use crate::catalog::SchemaResolver;
use crate::descriptor::{PrimitiveKind, SchemaDescriptor, SchemaKind};
use crate::engine::{CompiledSchema, StandardEngine, ValidationEngine};
use crate::error::SchemaResult;
use serde_json::{Map, Value};
use std::sync::Arc;
use tenet_docs::{
    DefinitionChange, Definitions, DocSchema, DocType, Required, DEFINITIONS_PREFIX,
};

/// Pairs a [`ValidationEngine`] with the documentation translation.
#[derive(Debug, Clone)]
pub struct SchemaBridge {
    engine: Arc<dyn ValidationEngine>,
}

impl Default for SchemaBridge {
    fn default() -> Self {
        Self::new(Arc::new(StandardEngine))
    }
}

impl SchemaBridge {
    /// Bridge backed by `engine`.
    #[must_use]
    pub fn new(engine: Arc<dyn ValidationEngine>) -> Self {
        Self { engine }
    }

    /// The validation engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn ValidationEngine> {
        &self.engine
    }

    /// Compile `schema` into an executable validator.
    pub fn to_validation(
        &self,
        schema: &SchemaDescriptor,
        resolver: &dyn SchemaResolver,
    ) -> SchemaResult<Arc<dyn CompiledSchema>> {
        self.engine.compile(schema, resolver)
    }

    /// See [`to_documentation`].
    pub fn to_documentation(
        &self,
        schema: &SchemaDescriptor,
        definitions: &mut Definitions,
    ) -> DocSchema {
        to_documentation(schema, definitions)
    }

    /// See [`to_internal`].
    #[must_use]
    pub fn to_internal(
        &self,
        fragment: &Value,
        model: Option<&SchemaDescriptor>,
    ) -> Option<SchemaDescriptor> {
        to_internal(fragment, model)
    }
}

/// Produce the documentation fragment for `schema`.
///
/// Objects and arrays with an id are filed into `definitions` and replaced
/// by a `$ref` that also carries `description` and `required`. An array
/// whose items carry an id is documented inline with the same two keys.
pub fn to_documentation(schema: &SchemaDescriptor, definitions: &mut Definitions) -> DocSchema {
    match (&schema.kind, &schema.id) {
        (SchemaKind::Object(_) | SchemaKind::Array(_), Some(id)) => {
            let structural = structural(schema, definitions);
            define(definitions, id, structural);
            flagged(DocSchema::reference(id), schema)
        }
        (SchemaKind::Reference(id), _) => flagged(DocSchema::reference(id), schema),
        (SchemaKind::Array(Some(items)), None) if items.id.is_some() => {
            let doc = structural(schema, definitions);
            flagged(doc, schema)
        }
        _ => structural(schema, definitions),
    }
}

fn flagged(mut doc: DocSchema, schema: &SchemaDescriptor) -> DocSchema {
    doc.description = Some(schema.description.clone().unwrap_or_default());
    doc.required = Some(Required::Flag(schema.required));
    doc
}

fn define(definitions: &mut Definitions, id: &str, schema: DocSchema) {
    if definitions.insert(id, schema) == DefinitionChange::Replaced {
        tracing::warn!(
            schema_id = %id,
            "definition overwritten with different content; the last declaration wins"
        );
    }
}

/// Fragment used inside properties and items: a bare `$ref` for anything
/// with an id.
fn nested(schema: &SchemaDescriptor, definitions: &mut Definitions) -> DocSchema {
    match (&schema.kind, &schema.id) {
        (SchemaKind::Object(_) | SchemaKind::Array(_), Some(id)) => {
            let structural = structural(schema, definitions);
            define(definitions, id, structural);
            let mut doc = DocSchema::reference(id);
            doc.description = schema.description.clone();
            doc
        }
        (SchemaKind::Reference(id), _) => {
            let mut doc = DocSchema::reference(id);
            doc.description = schema.description.clone();
            doc
        }
        _ => structural(schema, definitions),
    }
}

fn structural(schema: &SchemaDescriptor, definitions: &mut Definitions) -> DocSchema {
    let mut doc = match &schema.kind {
        SchemaKind::Primitive(kind) => DocSchema {
            schema_type: kind.doc_type(),
            ..DocSchema::default()
        },
        SchemaKind::Object(fields) => {
            let mut doc = DocSchema::object();
            let mut required = Vec::new();
            for (name, field) in fields {
                if field.required {
                    required.push(name.clone());
                }
                doc.properties
                    .insert(name.clone(), nested(field, definitions));
            }
            if !required.is_empty() {
                doc.required = Some(Required::Fields(required));
            }
            doc
        }
        SchemaKind::Array(Some(items)) => DocSchema::array(nested(items, definitions)),
        SchemaKind::Array(None) => {
            tracing::warn!(
                schema_id = schema.id.as_deref().unwrap_or("<inline>"),
                "array declared without an item schema; documenting it as an untyped array"
            );
            DocSchema::typed(DocType::Array)
        }
        SchemaKind::Reference(id) => DocSchema::reference(id),
    };

    let constraints = &schema.constraints;
    doc.description = schema.description.clone();
    doc.default = schema.default.clone();
    doc.example = schema.example.clone();
    doc.format = schema.format.clone();
    doc.minimum = constraints.minimum;
    doc.maximum = constraints.maximum;
    doc.min_length = constraints.min_length;
    doc.max_length = constraints.max_length;
    doc.pattern = constraints.pattern.clone();
    doc.enum_values = constraints.valid.clone();
    doc
}

/// Rebuild a descriptor from a wire-format documentation fragment.
///
/// `model` supplies the fields of a referenced definition and the defaults
/// of properties the fragment does not describe. Returns `None` when the
/// fragment uses a type this crate cannot express; callers treat that as
/// "no constraint".
#[must_use]
pub fn to_internal(fragment: &Value, model: Option<&SchemaDescriptor>) -> Option<SchemaDescriptor> {
    let fragment = fragment.as_object()?;

    if let Some(reference) = fragment.get("$ref").and_then(Value::as_str) {
        let id = reference.strip_prefix(DEFINITIONS_PREFIX).unwrap_or(reference);
        let mut schema = match model {
            Some(model) => {
                let mut schema = model.clone();
                schema.id.get_or_insert_with(|| id.to_string());
                schema
            }
            None => SchemaDescriptor::reference(id),
        };
        annotate(&mut schema, fragment);
        return Some(schema);
    }

    let kind = match fragment.get("type") {
        None if fragment.contains_key("properties") => object_kind(fragment, model),
        None => match model {
            Some(model) => model.kind.clone(),
            None => SchemaKind::Primitive(PrimitiveKind::Any),
        },
        Some(Value::String(name)) => match name.as_str() {
            "string" => SchemaKind::Primitive(PrimitiveKind::String),
            "number" => SchemaKind::Primitive(PrimitiveKind::Number),
            "integer" => SchemaKind::Primitive(PrimitiveKind::Integer),
            "boolean" => SchemaKind::Primitive(PrimitiveKind::Boolean),
            "file" => SchemaKind::Primitive(PrimitiveKind::File),
            "object" => object_kind(fragment, model),
            "array" => {
                let item_model = model.and_then(|model| model.items().or(Some(model)));
                let items = fragment
                    .get("items")
                    .and_then(|items| to_internal(items, item_model))
                    .unwrap_or_else(SchemaDescriptor::any);
                SchemaKind::Array(Some(Box::new(items)))
            }
            _ => return None,
        },
        Some(_) => return None,
    };

    let mut schema = SchemaDescriptor::new(kind);
    annotate(&mut schema, fragment);
    Some(schema)
}

fn object_kind(fragment: &Map<String, Value>, model: Option<&SchemaDescriptor>) -> SchemaKind {
    let properties = fragment.get("properties").and_then(Value::as_object);

    let Some(properties) = properties.filter(|properties| !properties.is_empty()) else {
        return match model {
            Some(SchemaDescriptor {
                kind: SchemaKind::Object(fields),
                ..
            }) => SchemaKind::Object(fields.clone()),
            _ => SchemaKind::Object(Default::default()),
        };
    };

    let required: Vec<&str> = fragment
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let fields = properties
        .iter()
        .map(|(name, property)| {
            let field_model = model.and_then(|model| model.field(name));
            let mut field = to_internal(property, field_model).unwrap_or_else(SchemaDescriptor::any);
            if required.contains(&name.as_str()) {
                field.required = true;
            }
            if field.default.is_none() {
                field.default = field_model.and_then(|model| model.default.clone());
            }
            (name.clone(), field)
        })
        .collect();

    SchemaKind::Object(fields)
}

fn annotate(schema: &mut SchemaDescriptor, fragment: &Map<String, Value>) {
    if let Some(description) = fragment.get("description").and_then(Value::as_str) {
        schema.description = Some(description.to_string());
    }
    if let Some(Value::Bool(required)) = fragment.get("required") {
        schema.required = *required;
    }
    if let Some(default) = fragment.get("default") {
        schema.default = Some(default.clone());
    }
    if let Some(example) = fragment.get("example") {
        schema.example = Some(example.clone());
    }
    if let Some(format) = fragment.get("format").and_then(Value::as_str) {
        schema.format = Some(format.to_string());
    }
    if let Some(values) = fragment.get("enum").and_then(Value::as_array) {
        schema.constraints.valid = values.clone();
    }
    if let Some(minimum) = fragment.get("minimum").and_then(Value::as_f64) {
        schema.constraints.minimum = Some(minimum);
    }
    if let Some(maximum) = fragment.get("maximum").and_then(Value::as_f64) {
        schema.constraints.maximum = Some(maximum);
    }
    if let Some(length) = fragment.get("minLength").and_then(Value::as_u64) {
        schema.constraints.min_length = Some(length);
    }
    if let Some(length) = fragment.get("maxLength").and_then(Value::as_u64) {
        schema.constraints.max_length = Some(length);
    }
    if let Some(pattern) = fragment.get("pattern").and_then(Value::as_str) {
        schema.constraints.pattern = Some(pattern.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoReferences;
    use crate::engine::ValidateOptions;
    use serde_json::json;

    fn user() -> SchemaDescriptor {
        SchemaDescriptor::object([
            ("id", SchemaDescriptor::integer().required()),
            ("name", SchemaDescriptor::string().description("Display name")),
        ])
        .id("User")
    }

    #[test]
    fn test_primitive_fragment() {
        let mut definitions = Definitions::new();
        let doc = to_documentation(
            &SchemaDescriptor::string().max_length(5).description("nick"),
            &mut definitions,
        );

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "type": "string", "maxLength": 5, "description": "nick" })
        );
        assert!(definitions.is_empty());
    }

    #[test]
    fn test_object_with_id_becomes_flagged_reference() {
        let mut definitions = Definitions::new();
        let doc = to_documentation(&user(), &mut definitions);

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "$ref": "#/definitions/User", "description": "", "required": false })
        );
        assert_eq!(
            serde_json::to_value(definitions.get("User").unwrap()).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "name": { "type": "string", "description": "Display name" }
                },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn test_repeated_registration_is_idempotent() {
        let mut definitions = Definitions::new();
        to_documentation(&user(), &mut definitions);
        to_documentation(&user(), &mut definitions);
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_conflicting_registration_keeps_last() {
        let mut definitions = Definitions::new();
        to_documentation(&user(), &mut definitions);
        let replacement =
            SchemaDescriptor::object([("email", SchemaDescriptor::string())]).id("User");
        to_documentation(&replacement, &mut definitions);

        let stored = definitions.get("User").unwrap();
        assert!(stored.properties.contains_key("email"));
        assert!(!stored.properties.contains_key("id"));
    }

    #[test]
    fn test_array_of_referenced_items() {
        let mut definitions = Definitions::new();
        let doc = to_documentation(
            &SchemaDescriptor::array(user()).required(),
            &mut definitions,
        );

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "array",
                "items": { "$ref": "#/definitions/User" },
                "description": "",
                "required": true
            })
        );
        assert!(definitions.contains("User"));
    }

    #[test]
    fn test_nested_definitions_are_bare_references() {
        let mut definitions = Definitions::new();
        let team = SchemaDescriptor::object([("lead", user())]);
        let doc = to_documentation(&team, &mut definitions);

        assert_eq!(
            serde_json::to_value(&doc.properties["lead"]).unwrap(),
            json!({ "$ref": "#/definitions/User" })
        );
        assert!(definitions.contains("User"));
    }

    #[test]
    fn test_malformed_array_degrades() {
        let mut definitions = Definitions::new();
        let doc = to_documentation(
            &SchemaDescriptor::new(SchemaKind::Array(None)),
            &mut definitions,
        );
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "type": "array" }));
    }

    #[test]
    fn test_to_internal_primitives_and_required() {
        let schema = to_internal(
            &json!({
                "type": "object",
                "properties": {
                    "age": { "type": "integer", "minimum": 0 },
                    "nick": { "type": "string", "pattern": "^[a-z]+$" }
                },
                "required": ["age"]
            }),
            None,
        )
        .unwrap();

        let age = schema.field("age").unwrap();
        assert_eq!(age.kind, SchemaKind::Primitive(PrimitiveKind::Integer));
        assert!(age.required);
        assert_eq!(age.constraints.minimum, Some(0.0));
        assert_eq!(
            schema.field("nick").unwrap().constraints.pattern.as_deref(),
            Some("^[a-z]+$")
        );
    }

    #[test]
    fn test_to_internal_unsupported_type() {
        assert!(to_internal(&json!({ "type": "tuple" }), None).is_none());
        assert!(to_internal(&json!("string"), None).is_none());
    }

    #[test]
    fn test_to_internal_reference_uses_model() {
        let fragment = json!({ "$ref": "#/definitions/User", "description": "owner", "required": true });

        let with_model = to_internal(&fragment, Some(&user())).unwrap();
        assert!(with_model.field("id").is_some());
        assert!(with_model.required);
        assert_eq!(with_model.description.as_deref(), Some("owner"));

        let without_model = to_internal(&fragment, None).unwrap();
        assert_eq!(without_model.kind, SchemaKind::Reference("User".to_string()));
    }

    #[test]
    fn test_to_internal_fills_defaults_from_model() {
        let model = SchemaDescriptor::object([(
            "page",
            SchemaDescriptor::integer().default_value(json!(1)),
        )]);
        let schema = to_internal(
            &json!({ "type": "object", "properties": { "page": { "type": "integer" } } }),
            Some(&model),
        )
        .unwrap();

        assert_eq!(schema.field("page").unwrap().default, Some(json!(1)));
    }

    #[test]
    fn test_bridge_compiles_reconstructed_schema() {
        let bridge = SchemaBridge::default();
        let schema = bridge
            .to_internal(
                &json!({ "type": "object", "properties": { "n": { "type": "number" } }, "required": ["n"] }),
                None,
            )
            .unwrap();
        let compiled = bridge.to_validation(&schema, &NoReferences).unwrap();

        assert_eq!(
            compiled
                .validate(&json!({ "n": "3" }), &ValidateOptions::strict())
                .unwrap(),
            json!({ "n": 3 })
        );
        assert_eq!(bridge.engine().name(), "standard");
    }
}
