//! Route compilation.
//!
//! [`ApiRouter`] walks the declarations held by a [`Registry`], mounts one
//! middleware [`Chain`] per declared `(path, verb)` on a [`RouteSink`] and
//! records the matching operation in the [`ApiDocument`].

use crate::app::App;
use crate::path;
use crate::sink::{RouteSink, RouteTable};
use http::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tenet_config::ApiConfig;
use tenet_core::{BoxFuture, Context, Handler, TenetError, TenetResult};
use tenet_docs::ApiDocument;
use tenet_extract::ExtractConfig;
use tenet_middleware::{Chain, HandlerDecorator, HandlerStage, ValidationSynthesizer};
use tenet_registry::{ControllerKey, Registry};
use tenet_schema::{
    to_documentation, SchemaBridge, SchemaCatalog, SchemaDescriptor, SchemaResolver,
    ValidationEngine,
};
use tracing::{debug, info, warn};

/// Compiles registered controllers into mounted routes and an API document.
///
/// One `ApiRouter` owns one document; several routers can compile
/// independent APIs in the same process.
///
/// # Example
///
/// ```
/// use tenet::prelude::*;
/// use http::StatusCode;
/// use serde_json::json;
///
/// struct Health;
///
/// let mut registry = Registry::new();
/// registry
///     .controller::<Health>("/health")
///     .method("status")
///     .get("/")
///     .summary("Liveness")
///     .handler(|ctx| Box::pin(async move {
///         ctx.respond(StatusCode::OK, json!({ "ok": true }));
///         Ok(())
///     }));
///
/// let mut router = ApiRouter::new(ApiConfig::default());
/// router.load_registry(&registry).unwrap();
/// assert!(router.document().route("/health", "get").is_some());
/// ```
pub struct ApiRouter<S: RouteSink = RouteTable> {
    document: ApiDocument,
    definitions: SchemaCatalog,
    synthesizer: ValidationSynthesizer,
    sink: S,
    document_file: Option<String>,
    extract: ExtractConfig,
}

impl<S: RouteSink> std::fmt::Debug for ApiRouter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRouter")
            .field("base_path", &self.document.base_path)
            .field("operations", &self.document.operation_count())
            .field("document_file", &self.document_file)
            .finish_non_exhaustive()
    }
}

impl ApiRouter<RouteTable> {
    /// A router mounting onto the built-in [`RouteTable`].
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_sink(config, RouteTable::new())
    }

    /// Freezes the document and wraps the routes into a servable [`App`].
    ///
    /// # Errors
    ///
    /// Same as [`finish`](Self::finish).
    pub fn into_app(self) -> TenetResult<App> {
        let extract = self.extract;
        let (routes, document) = self.finish()?;
        Ok(App::new(routes, document).with_extract_config(extract))
    }
}

impl<S: RouteSink> ApiRouter<S> {
    /// A router mounting onto `sink`.
    pub fn with_sink(config: ApiConfig, sink: S) -> Self {
        Self {
            document: config.document_skeleton(),
            definitions: SchemaCatalog::new(),
            synthesizer: ValidationSynthesizer::default(),
            sink,
            document_file: config.document.file_name,
            extract: ExtractConfig::default(),
        }
    }

    /// Compiles validators with `engine` instead of the standard engine.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn ValidationEngine>) -> Self {
        self.synthesizer = ValidationSynthesizer::new(SchemaBridge::new(engine));
        self
    }

    /// Body size limits applied when serving.
    #[must_use]
    pub fn with_extract_config(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }

    /// The document compiled so far.
    #[must_use]
    pub fn document(&self) -> &ApiDocument {
        &self.document
    }

    /// The sink routes are mounted on.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Compiles every route of the controller `key`.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if the controller was never declared, a
    /// routed method has no handler, or the sink rejects a route.
    pub fn load_controller(&mut self, registry: &Registry, key: ControllerKey) -> TenetResult<()> {
        self.compile_controller(registry, key, None)
    }

    /// Like [`load_controller`](Self::load_controller), with every handler
    /// of the controller wrapped by `decorator`.
    ///
    /// # Errors
    ///
    /// Same as [`load_controller`](Self::load_controller).
    pub fn load_controller_with(
        &mut self,
        registry: &Registry,
        key: ControllerKey,
        decorator: Arc<dyn HandlerDecorator>,
    ) -> TenetResult<()> {
        self.compile_controller(registry, key, Some(decorator))
    }

    /// Compiles every controller in `registry`, in declaration order.
    ///
    /// # Errors
    ///
    /// Stops at the first controller that fails to compile.
    pub fn load_registry(&mut self, registry: &Registry) -> TenetResult<()> {
        for (key, _) in registry.controllers() {
            self.compile_controller(registry, key, None)?;
        }
        Ok(())
    }

    fn compile_controller(
        &mut self,
        registry: &Registry,
        key: ControllerKey,
        decorator: Option<Arc<dyn HandlerDecorator>>,
    ) -> TenetResult<()> {
        let controller = registry.entries_for(key).ok_or_else(|| {
            TenetError::declaration(format!("controller {key} was never declared"))
        })?;

        for (id, schema) in registry.catalog().iter() {
            if !self.document.definitions.contains(id) {
                self.file_definition(id, schema);
            }
        }

        for route in controller.routes() {
            let Some(entry) = controller.handler(&route.method_key) else {
                continue;
            };

            let joined = path::join(controller.prefix(), &route.path);
            let doc_key = path::strip_base(&joined, &self.document.base_path).to_string();
            let route_doc = entry.document(&mut self.document.definitions);

            match parse_verb(&route.verb) {
                Some(method) => {
                    let handler = entry.handler().ok_or_else(|| {
                        TenetError::declaration(format!(
                            "{key}::{} is routed to {} {} but has no handler",
                            route.method_key, route.verb, route.path
                        ))
                    })?;

                    let mut stage = HandlerStage::new(Arc::clone(handler))
                        .with_summary(route_doc.summary.clone());
                    if let Some(decorator) = &decorator {
                        stage = stage.with_decorator(Arc::clone(decorator));
                    }

                    let resolver = DefinitionScope {
                        router: &self.definitions,
                        registry: registry.catalog(),
                    };
                    let chain = entry
                        .middleware()
                        .iter()
                        .fold(Chain::builder(), |builder, middleware| {
                            builder.shared_middleware(Arc::clone(middleware))
                        })
                        .request_validator(
                            self.synthesizer
                                .request_validator(entry.parameters(), &resolver),
                        )
                        .response_validator(
                            self.synthesizer
                                .response_validator(entry.responses(), &resolver),
                        )
                        .handler(stage)
                        .build();

                    let mount = path::to_router_path(&path::join(&self.document.base_path, &doc_key));
                    self.sink
                        .register(method, &mount, chain)
                        .map_err(|e| TenetError::declaration(e.to_string()))?;

                    info!(
                        controller = controller.name(),
                        method_key = %route.method_key,
                        verb = %route.verb,
                        path = %mount,
                        "route mounted"
                    );
                }
                None => warn!(
                    controller = controller.name(),
                    method_key = %route.method_key,
                    verb = %route.verb,
                    "unknown verb; documenting the route without mounting it"
                ),
            }

            if self
                .document
                .record_route(doc_key.clone(), route.verb.clone(), route_doc)
                .is_some()
            {
                warn!(path = %doc_key, verb = %route.verb, "operation documented twice; keeping the latest");
            }
        }

        Ok(())
    }

    /// Files `schema` into the document's definitions under its id.
    ///
    /// References to the id resolve against it when validators for routes
    /// loaded afterwards are compiled.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if `schema` has no id.
    pub fn add_definition(&mut self, schema: &SchemaDescriptor) -> TenetResult<()> {
        let Some(id) = schema.id.as_deref() else {
            return Err(TenetError::declaration(
                "schema has no id; give it one with .id(..) before adding it as a definition",
            ));
        };

        self.definitions
            .register(schema)
            .map_err(|e| TenetError::declaration(e.to_string()))?;
        self.file_definition(id, schema);
        debug!(schema_id = %id, "definition added");
        Ok(())
    }

    fn file_definition(&mut self, id: &str, schema: &SchemaDescriptor) {
        if schema.is_definition() {
            to_documentation(schema, &mut self.document.definitions);
        } else {
            let fragment = to_documentation(schema, &mut self.document.definitions);
            self.document.definitions.insert(id, fragment);
        }
    }

    /// Serves the frozen document as JSON under `name`, below the base path.
    pub fn set_document_file(&mut self, name: impl Into<String>) {
        self.document_file = Some(name.into());
    }

    /// The path the document is served at, if any.
    #[must_use]
    pub fn document_file(&self) -> Option<String> {
        let name = self.document_file.as_deref()?;
        Some(format!("{}/{name}", self.document.base_path))
    }

    /// Freezes the document and hands back the sink with every route
    /// mounted, the document route included.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if the document route cannot be mounted
    /// or the document does not serialize.
    pub fn finish(mut self) -> TenetResult<(S, Arc<ApiDocument>)> {
        if let Some(file) = self.document_file() {
            let body = serde_json::to_value(&self.document)
                .map_err(|e| TenetError::internal_with_source("document does not serialize", e))?;
            let chain = Chain::builder()
                .handler(HandlerStage::new(Arc::new(ServeDocument {
                    body: Arc::new(body),
                })))
                .build();
            self.sink
                .register(Method::GET, &file, chain)
                .map_err(|e| TenetError::declaration(e.to_string()))?;
            info!(path = %file, "document route mounted");
        }

        Ok((self.sink, Arc::new(self.document)))
    }
}

fn parse_verb(verb: &str) -> Option<Method> {
    match verb {
        "get" => Some(Method::GET),
        "post" => Some(Method::POST),
        "put" => Some(Method::PUT),
        "patch" => Some(Method::PATCH),
        "delete" => Some(Method::DELETE),
        "head" => Some(Method::HEAD),
        "options" => Some(Method::OPTIONS),
        _ => None,
    }
}

// Router-level definitions shadow the registry's.
struct DefinitionScope<'a> {
    router: &'a SchemaCatalog,
    registry: &'a SchemaCatalog,
}

impl SchemaResolver for DefinitionScope<'_> {
    fn resolve(&self, id: &str) -> Option<&SchemaDescriptor> {
        self.router.resolve(id).or_else(|| self.registry.resolve(id))
    }
}

struct ServeDocument {
    body: Arc<Value>,
}

impl Handler for ServeDocument {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, TenetResult<()>> {
        Box::pin(async move {
            ctx.respond(StatusCode::OK, Value::clone(&self.body));
            Ok(())
        })
    }
}
