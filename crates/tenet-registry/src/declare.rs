//! Builders for declaring controllers in ordinary setup code.

use crate::contributor::{self, Contributor};
use crate::key::ControllerKey;
use crate::registry::Registry;
use std::sync::Arc;
use tenet_core::{BoxFuture, Context, Handler, TenetResult};
use tenet_docs::{Definitions, ParameterIn, RouteDocument, SecurityRequirement};
use tenet_middleware::Middleware;
use tenet_schema::{ParameterBinding, ResponseBinding, SchemaDescriptor};

/// Declares the handlers of one controller.
///
/// Obtained from [`Registry::controller`] or handed to
/// [`Controller::declare`](crate::Controller::declare).
#[derive(Debug)]
pub struct ControllerDeclaration<'r> {
    registry: &'r mut Registry,
    key: ControllerKey,
}

impl<'r> ControllerDeclaration<'r> {
    pub(crate) fn new(registry: &'r mut Registry, key: ControllerKey) -> Self {
        Self { registry, key }
    }

    /// The controller being declared.
    #[must_use]
    pub fn key(&self) -> ControllerKey {
        self.key
    }

    /// Starts declaring the handler `method_key`.
    pub fn method(&mut self, method_key: impl Into<String>) -> MethodDeclaration<'_> {
        MethodDeclaration {
            registry: &mut *self.registry,
            key: self.key,
            method_key: method_key.into(),
        }
    }
}

/// Declares one handler method.
///
/// Every call registers immediately, in call order. That order is the order
/// in which contributors shape the route's documentation.
///
/// ```
/// use std::sync::Arc;
/// use http::StatusCode;
/// use serde_json::json;
/// use tenet_docs::ParameterIn;
/// use tenet_registry::Registry;
/// use tenet_schema::SchemaDescriptor;
///
/// struct Users;
///
/// let mut registry = Registry::new();
/// registry
///     .controller::<Users>("/users")
///     .method("show")
///     .get("/{id}")
///     .summary("Fetch a user")
///     .tag("users")
///     .parameter("id", ParameterIn::Path, SchemaDescriptor::integer())
///     .response(200, SchemaDescriptor::object([("id", SchemaDescriptor::integer())]))
///     .handler(|ctx| {
///         Box::pin(async move {
///             let id = ctx.params()["id"].clone();
///             ctx.respond(StatusCode::OK, json!({ "id": id }));
///             Ok(())
///         })
///     });
///
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug)]
pub struct MethodDeclaration<'d> {
    registry: &'d mut Registry,
    key: ControllerKey,
    method_key: String,
}

impl MethodDeclaration<'_> {
    /// Mounts the handler on `verb` at `path`, relative to the controller
    /// prefix. `{name}` marks a path parameter.
    pub fn route(self, verb: &str, path: &str) -> Self {
        self.registry
            .register_route(self.key, &self.method_key, verb, path);
        self
    }

    /// Mounts on `GET`.
    pub fn get(self, path: &str) -> Self {
        self.route("get", path)
    }

    /// Mounts on `POST`.
    pub fn post(self, path: &str) -> Self {
        self.route("post", path)
    }

    /// Mounts on `PUT`.
    pub fn put(self, path: &str) -> Self {
        self.route("put", path)
    }

    /// Mounts on `PATCH`.
    pub fn patch(self, path: &str) -> Self {
        self.route("patch", path)
    }

    /// Mounts on `DELETE`.
    pub fn delete(self, path: &str) -> Self {
        self.route("delete", path)
    }

    /// Declares a parameter.
    pub fn parameter(self, name: &str, location: ParameterIn, schema: SchemaDescriptor) -> Self {
        self.binding(ParameterBinding::new(name, location, schema))
    }

    /// Declares a prepared parameter binding.
    pub fn binding(self, binding: ParameterBinding) -> Self {
        self.registry
            .register_parameter(self.key, &self.method_key, binding);
        self
    }

    /// Declares the response for `status`.
    pub fn response(self, status: u16, schema: SchemaDescriptor) -> Self {
        self.registry
            .register_response(self.key, &self.method_key, ResponseBinding::new(status, schema));
        self
    }

    /// Declares a response for `status` without a body schema.
    pub fn empty_response(self, status: u16) -> Self {
        self.registry
            .register_response(self.key, &self.method_key, ResponseBinding::empty(status));
        self
    }

    /// Sets the summary.
    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.contributor(contributor::summary(summary))
    }

    /// Sets the description.
    pub fn description(self, description: impl Into<String>) -> Self {
        self.contributor(contributor::description(description))
    }

    /// Adds a tag.
    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.contributor(contributor::tag(tag))
    }

    /// Sets the operation id.
    pub fn operation_id(self, operation_id: impl Into<String>) -> Self {
        self.contributor(contributor::operation_id(operation_id))
    }

    /// Replaces the accepted content types.
    pub fn consumes<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contributor(contributor::consumes(types.into_iter().map(Into::into).collect()))
    }

    /// Replaces the produced content types.
    pub fn produces<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contributor(contributor::produces(types.into_iter().map(Into::into).collect()))
    }

    /// Marks the route deprecated.
    pub fn deprecated(self) -> Self {
        self.contributor(contributor::deprecated())
    }

    /// Requires `scheme` with `scopes`.
    pub fn security<I, S>(self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self.contributor(contributor::security(requirement))
    }

    /// Adds a documentation contributor.
    pub fn contributor(self, contributor: Contributor) -> Self {
        self.registry
            .register_middleware_contributor(self.key, &self.method_key, contributor);
        self
    }

    /// Adds a documentation contributor from a closure.
    pub fn document<F>(self, f: F) -> Self
    where
        F: Fn(RouteDocument, &mut Definitions) -> RouteDocument + Send + Sync + 'static,
    {
        self.contributor(contributor::from_fn(f))
    }

    /// Adds middleware that runs ahead of the validators.
    pub fn middleware<M: Middleware>(self, middleware: M) -> Self {
        self.shared_middleware(Arc::new(middleware))
    }

    /// Adds shared middleware that runs ahead of the validators.
    pub fn shared_middleware(self, middleware: Arc<dyn Middleware>) -> Self {
        self.registry
            .register_middleware(self.key, &self.method_key, middleware);
        self
    }

    /// Sets the handler.
    pub fn handler<F>(self, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, TenetResult<()>> + Send + Sync + 'static,
    {
        self.shared_handler(Arc::new(handler))
    }

    /// Sets a shared handler.
    pub fn shared_handler(self, handler: Arc<dyn Handler>) -> Self {
        self.registry
            .register_handler(self.key, &self.method_key, handler);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use serde_json::json;
    use tenet_middleware::FnMiddleware;

    struct Files;

    fn declare(registry: &mut Registry) -> ControllerKey {
        let mut controller = registry.controller::<Files>("/files");
        controller
            .method("upload")
            .post("/")
            .consumes(["multipart/form-data"])
            .parameter("avatar", ParameterIn::FormData, SchemaDescriptor::file().required())
            .empty_response(201)
            .middleware(FnMiddleware::new("audit", |ctx, next| Box::pin(next.run(ctx))))
            .handler(|ctx| {
                Box::pin(async move {
                    ctx.set_status(StatusCode::CREATED);
                    Ok(())
                })
            });
        controller
            .method("show")
            .get("/{name}")
            .security("bearer", ["files:read"])
            .deprecated();
        controller.key()
    }

    #[test]
    fn test_declaration_lands_in_registry() {
        let mut registry = Registry::new();
        let key = declare(&mut registry);

        let entry = registry.entries_for(key).unwrap();
        assert_eq!(entry.prefix(), "/files");
        assert_eq!(entry.routes().len(), 2);

        let upload = entry.handler("upload").unwrap();
        assert_eq!(upload.parameters().len(), 1);
        assert_eq!(upload.responses()[0].status(), 201);
        assert_eq!(upload.middleware()[0].name(), "audit");
        assert!(upload.handler().is_some());

        let doc = upload.document(&mut Definitions::new());
        assert_eq!(doc.consumes, vec!["multipart/form-data"]);
        assert_eq!(doc.parameters[0].name, "avatar");

        let show = entry.handler("show").unwrap();
        assert!(show.handler().is_none());
        let doc = show.document(&mut Definitions::new());
        assert!(doc.deprecated);
        assert_eq!(doc.security[0]["bearer"], vec!["files:read"]);
    }

    #[tokio::test]
    async fn test_declared_handler_runs() {
        let mut registry = Registry::new();
        let key = declare(&mut registry);
        let handler = registry
            .entries_for(key)
            .and_then(|entry| entry.handler("upload"))
            .and_then(|upload| upload.handler())
            .cloned()
            .unwrap();

        let mut ctx = Context::new(Method::POST, "/files").with_body(json!({}));
        handler.call(&mut ctx).await.unwrap();
        assert_eq!(ctx.status(), StatusCode::CREATED);
    }
}
