//! Catalogue of schemas that carry an id.

use crate::descriptor::{SchemaDescriptor, SchemaKind};
use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use tenet_docs::DefinitionChange;

/// Resolves schema ids to descriptors.
pub trait SchemaResolver {
    /// Descriptor registered under `id`.
    fn resolve(&self, id: &str) -> Option<&SchemaDescriptor>;
}

/// Resolver for descriptors that never reference anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl SchemaResolver for NoReferences {
    fn resolve(&self, _id: &str) -> Option<&SchemaDescriptor> {
        None
    }
}

/// Every schema with an id seen during declaration.
///
/// References resolve against this table when validators are compiled.
/// Re-registering an id with different content replaces the earlier
/// descriptor and logs a warning.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: IndexMap<String, SchemaDescriptor>,
}

impl SchemaCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its id.
    pub fn register(&mut self, schema: &SchemaDescriptor) -> SchemaResult<DefinitionChange> {
        let id = schema.id.clone().ok_or(SchemaError::MissingId)?;
        let change = match self.schemas.insert(id.clone(), schema.clone()) {
            None => DefinitionChange::Inserted,
            Some(previous) if previous == *schema => DefinitionChange::Unchanged,
            Some(_) => {
                tracing::warn!(schema_id = %id, "schema id re-registered with different content; keeping the latest");
                DefinitionChange::Replaced
            }
        };
        Ok(change)
    }

    /// Register every object or array with an id found in `schema`,
    /// including nested ones.
    pub fn collect(&mut self, schema: &SchemaDescriptor) {
        match &schema.kind {
            SchemaKind::Object(fields) => {
                for field in fields.values() {
                    self.collect(field);
                }
            }
            SchemaKind::Array(Some(items)) => self.collect(items),
            SchemaKind::Array(None) | SchemaKind::Primitive(_) | SchemaKind::Reference(_) => {}
        }

        if schema.is_definition() {
            // is_definition guarantees an id, so this cannot fail
            let _ = self.register(schema);
        }
    }

    /// Schema registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(id)
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Number of schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaDescriptor)> {
        self.schemas.iter()
    }

    /// Register everything from `other`.
    pub fn merge(&mut self, other: &SchemaCatalog) {
        for schema in other.schemas.values() {
            let _ = self.register(schema);
        }
    }
}

impl SchemaResolver for SchemaCatalog {
    fn resolve(&self, id: &str) -> Option<&SchemaDescriptor> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> SchemaDescriptor {
        SchemaDescriptor::object([("city", SchemaDescriptor::string())]).id("Address")
    }

    fn user() -> SchemaDescriptor {
        SchemaDescriptor::object([
            ("name", SchemaDescriptor::string()),
            ("address", address()),
            ("previous", SchemaDescriptor::array(address())),
        ])
        .id("User")
    }

    #[test]
    fn test_register_requires_id() {
        let mut catalog = SchemaCatalog::new();
        let err = catalog.register(&SchemaDescriptor::object([("a", SchemaDescriptor::any())]));
        assert!(matches!(err, Err(SchemaError::MissingId)));
    }

    #[test]
    fn test_register_outcomes() {
        let mut catalog = SchemaCatalog::new();
        assert_eq!(catalog.register(&address()).unwrap(), DefinitionChange::Inserted);
        assert_eq!(catalog.register(&address()).unwrap(), DefinitionChange::Unchanged);

        let changed = SchemaDescriptor::object([("zip", SchemaDescriptor::string())]).id("Address");
        assert_eq!(catalog.register(&changed).unwrap(), DefinitionChange::Replaced);
        assert_eq!(catalog.get("Address"), Some(&changed));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_collect_walks_nested_schemas() {
        let mut catalog = SchemaCatalog::new();
        catalog.collect(&user());

        assert!(catalog.contains("User"));
        assert!(catalog.contains("Address"));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.resolve("Address").is_some());
    }

    #[test]
    fn test_collect_ignores_primitives_with_id() {
        let mut catalog = SchemaCatalog::new();
        catalog.collect(&SchemaDescriptor::string().id("Name"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_no_references() {
        assert!(NoReferences.resolve("User").is_none());
    }
}
