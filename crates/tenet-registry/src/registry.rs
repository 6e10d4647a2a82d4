//! The declaration registry.

use crate::contributor::{self, Contributor};
use crate::declare::ControllerDeclaration;
use crate::entry::{ControllerEntry, HandlerEntry};
use crate::key::ControllerKey;
use indexmap::IndexMap;
use std::sync::Arc;
use tenet_core::Handler;
use tenet_docs::DefinitionChange;
use tenet_middleware::Middleware;
use tenet_schema::{ParameterBinding, ResponseBinding, SchemaCatalog, SchemaDescriptor, SchemaResult};

/// A controller type that declares its own routes.
///
/// Implementing this trait is what marks a type as route-bearing.
///
/// ```
/// use tenet_registry::{Controller, ControllerDeclaration, Registry};
/// use tenet_schema::SchemaDescriptor;
/// use tenet_docs::ParameterIn;
///
/// struct Users;
///
/// impl Controller for Users {
///     fn prefix() -> &'static str {
///         "/users"
///     }
///
///     fn declare(controller: &mut ControllerDeclaration<'_>) {
///         controller
///             .method("show")
///             .get("/{id}")
///             .summary("Fetch a user")
///             .parameter("id", ParameterIn::Path, SchemaDescriptor::integer());
///     }
/// }
///
/// let mut registry = Registry::new();
/// let key = registry.register_controller::<Users>();
/// let entry = registry.entries_for(key).unwrap();
/// assert_eq!(entry.prefix(), "/users");
/// assert_eq!(entry.handler("show").unwrap().parameters().len(), 1);
/// ```
pub trait Controller: 'static {
    /// Path prefix for every route of the controller.
    fn prefix() -> &'static str;

    /// Declares the controller's handlers.
    fn declare(controller: &mut ControllerDeclaration<'_>);
}

/// Accumulates controller declarations until routes are compiled.
///
/// One registry per application. Registration is plain appending: the
/// first touch creates a controller or handler entry, later calls add to
/// it in call order. Compilation only needs `&Registry`.
#[derive(Debug, Default)]
pub struct Registry {
    controllers: IndexMap<ControllerKey, ControllerEntry>,
    catalog: SchemaCatalog,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the controller `key` with a path prefix.
    ///
    /// The prefix is fixed by the first declaration; a later, different
    /// prefix is ignored with a warning.
    pub fn declare_controller(&mut self, key: ControllerKey, prefix: impl Into<String>) {
        let prefix = prefix.into();
        let entry = self.controller_mut(key);
        if !entry.declared {
            entry.prefix = prefix;
            entry.declared = true;
        } else if entry.prefix != prefix {
            tracing::warn!(
                controller = key.name(),
                prefix = %entry.prefix,
                ignored = %prefix,
                "controller prefix already set"
            );
        }
    }

    /// Starts a declaration builder for controller type `C`.
    pub fn controller<C: 'static>(&mut self, prefix: impl Into<String>) -> ControllerDeclaration<'_> {
        let key = ControllerKey::of::<C>();
        self.declare_controller(key, prefix);
        ControllerDeclaration::new(self, key)
    }

    /// Declares controller `C` through its [`Controller`] impl.
    pub fn register_controller<C: Controller>(&mut self) -> ControllerKey {
        let mut declaration = self.controller::<C>(C::prefix());
        C::declare(&mut declaration);
        declaration.key()
    }

    /// Appends a parameter binding and its documentation.
    pub fn register_parameter(&mut self, key: ControllerKey, method_key: &str, binding: ParameterBinding) {
        self.catalog.collect(binding.schema());
        let entry = self.handler_mut(key, method_key);
        entry.contributors.push(contributor::parameter(binding.clone()));
        entry.parameters.push(binding);
    }

    /// Appends a response binding and its documentation.
    pub fn register_response(&mut self, key: ControllerKey, method_key: &str, binding: ResponseBinding) {
        self.catalog.collect(binding.schema());
        let entry = self.handler_mut(key, method_key);
        entry.contributors.push(contributor::response(binding.clone()));
        entry.responses.push(binding);
    }

    /// Appends a documentation contributor.
    pub fn register_middleware_contributor(
        &mut self,
        key: ControllerKey,
        method_key: &str,
        contributor: Contributor,
    ) {
        self.handler_mut(key, method_key).contributors.push(contributor);
    }

    /// Appends middleware that runs ahead of the validators.
    pub fn register_middleware(
        &mut self,
        key: ControllerKey,
        method_key: &str,
        middleware: Arc<dyn Middleware>,
    ) {
        self.handler_mut(key, method_key).middleware.push(middleware);
    }

    /// Sets the handler for `method_key`.
    pub fn register_handler(&mut self, key: ControllerKey, method_key: &str, handler: Arc<dyn Handler>) {
        let entry = self.handler_mut(key, method_key);
        if entry.handler.is_some() {
            tracing::warn!(
                controller = key.name(),
                method_key,
                "handler registered twice; keeping the latest"
            );
        }
        entry.handler = Some(handler);
    }

    /// Mounts `method_key` on `verb` at `path` (relative to the prefix).
    ///
    /// Verbs are stored lower-case.
    pub fn register_route(&mut self, key: ControllerKey, method_key: &str, verb: &str, path: &str) {
        self.handler_mut(key, method_key);
        let controller = self.controller_mut(key);
        let previous = controller
            .routes
            .insert((path.to_string(), verb.to_lowercase()), method_key.to_string());
        if let Some(previous) = previous.filter(|previous| previous != method_key) {
            tracing::warn!(
                controller = key.name(),
                verb,
                path,
                replaced = %previous,
                method_key,
                "route declared twice; keeping the latest"
            );
        }
    }

    /// Files a schema under its id so references to it resolve.
    pub fn register_definition(&mut self, schema: &SchemaDescriptor) -> SchemaResult<DefinitionChange> {
        self.catalog.register(schema)
    }

    /// The declarations for `key`.
    #[must_use]
    pub fn entries_for(&self, key: ControllerKey) -> Option<&ControllerEntry> {
        self.controllers.get(&key)
    }

    /// Every declared controller, in declaration order.
    pub fn controllers(&self) -> impl Iterator<Item = (ControllerKey, &ControllerEntry)> {
        self.controllers.iter().map(|(key, entry)| (*key, entry))
    }

    /// Every schema with an id seen so far.
    #[must_use]
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Number of declared controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    fn controller_mut(&mut self, key: ControllerKey) -> &mut ControllerEntry {
        self.controllers
            .entry(key)
            .or_insert_with(|| ControllerEntry::new(key.name()))
    }

    fn handler_mut(&mut self, key: ControllerKey, method_key: &str) -> &mut HandlerEntry {
        self.controller_mut(key).handler_mut(method_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenet_docs::{Definitions, ParameterIn};

    struct Users;
    struct Orders;

    fn users() -> ControllerKey {
        ControllerKey::of::<Users>()
    }

    #[test]
    fn test_first_touch_creates_entries() {
        let mut registry = Registry::new();
        registry.register_parameter(
            users(),
            "list",
            ParameterBinding::new("page", ParameterIn::Query, SchemaDescriptor::integer()),
        );

        let entry = registry.entries_for(users()).unwrap();
        assert_eq!(entry.prefix(), "");
        assert_eq!(entry.name(), "Users");
        assert_eq!(entry.handler("list").unwrap().parameters().len(), 1);
        assert!(registry.entries_for(ControllerKey::of::<Orders>()).is_none());
    }

    #[test]
    fn test_same_name_bindings_coexist_in_order() {
        let mut registry = Registry::new();
        registry.register_parameter(
            users(),
            "list",
            ParameterBinding::new("page", ParameterIn::Query, SchemaDescriptor::integer()),
        );
        registry.register_parameter(
            users(),
            "list",
            ParameterBinding::new("page", ParameterIn::Query, SchemaDescriptor::integer().min(1.0)),
        );

        let handler = registry.entries_for(users()).unwrap().handler("list").unwrap();
        let names: Vec<_> = handler.parameters().iter().map(ParameterBinding::name).collect();
        assert_eq!(names, vec!["page", "page"]);
        assert_eq!(handler.parameters()[1].schema().constraints.minimum, Some(1.0));
        assert_eq!(handler.contributors().len(), 2);
    }

    #[test]
    fn test_prefix_is_fixed_by_first_declaration() {
        let mut registry = Registry::new();
        registry.declare_controller(users(), "/users");
        registry.declare_controller(users(), "/people");
        assert_eq!(registry.entries_for(users()).unwrap().prefix(), "/users");
    }

    #[test]
    fn test_prefix_declared_after_first_touch() {
        let mut registry = Registry::new();
        registry.register_route(users(), "list", "GET", "/");
        registry.declare_controller(users(), "/users");
        assert_eq!(registry.entries_for(users()).unwrap().prefix(), "/users");
    }

    #[test]
    fn test_routes_group_by_path() {
        let mut registry = Registry::new();
        registry.register_route(users(), "show", "GET", "/{id}");
        registry.register_route(users(), "list", "get", "/");
        registry.register_route(users(), "remove", "DELETE", "/{id}");

        let routes = registry.entries_for(users()).unwrap().routes();
        let flat: Vec<_> = routes
            .iter()
            .map(|r| (r.path.as_str(), r.verb.as_str(), r.method_key.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("/{id}", "get", "show"),
                ("/{id}", "delete", "remove"),
                ("/", "get", "list"),
            ]
        );
    }

    #[test]
    fn test_bindings_collect_definitions() {
        let address = SchemaDescriptor::object([("city", SchemaDescriptor::string())]).id("Address");
        let user = SchemaDescriptor::object([("address", address)]).id("User");

        let mut registry = Registry::new();
        registry.register_response(users(), "show", ResponseBinding::new(200, user));

        assert!(registry.catalog().contains("User"));
        assert!(registry.catalog().contains("Address"));
    }

    #[test]
    fn test_register_definition_requires_id() {
        let mut registry = Registry::new();
        let anonymous = SchemaDescriptor::object([("x", SchemaDescriptor::string())]);
        assert!(registry.register_definition(&anonymous).is_err());

        let named = anonymous.id("Point");
        assert_eq!(registry.register_definition(&named).unwrap(), DefinitionChange::Inserted);
        assert_eq!(registry.register_definition(&named).unwrap(), DefinitionChange::Unchanged);
    }

    #[test]
    fn test_handler_document_runs_contributors() {
        let mut registry = Registry::new();
        registry.register_middleware_contributor(users(), "show", contributor::summary("Fetch"));
        registry.register_response(users(), "show", ResponseBinding::empty(204));
        registry.register_middleware_contributor(users(), "show", contributor::tag("users"));

        let handler = registry.entries_for(users()).unwrap().handler("show").unwrap();
        let doc = handler.document(&mut Definitions::new());
        assert_eq!(doc.summary, "Fetch");
        assert_eq!(doc.tags, vec!["users"]);
        assert!(doc.responses.contains_key("204"));
    }
}
