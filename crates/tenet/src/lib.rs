//! # Tenet
//!
//! Declare what each handler accepts and returns once, and get both
//! request/response validation and a Swagger 2.0 document from it.
//!
//! - Controllers declare routes, parameters, responses, documentation and
//!   middleware into a [`Registry`](registry::Registry)
//! - [`ApiRouter`] compiles the registry into one middleware chain per
//!   route and an [`ApiDocument`](docs::ApiDocument)
//! - [`App`] serves the compiled routes, or any other router takes them
//!   through [`RouteSink`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tenet::prelude::*;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! struct Users;
//!
//! let mut registry = Registry::new();
//! registry
//!     .controller::<Users>("/users")
//!     .method("show")
//!     .get("/{id}")
//!     .summary("Fetch one user")
//!     .parameter("id", ParameterIn::Path, SchemaDescriptor::integer())
//!     .response(200, SchemaDescriptor::object([("id", SchemaDescriptor::integer())]))
//!     .handler(|ctx| Box::pin(async move {
//!         let id = ctx.params().get("id").cloned();
//!         ctx.respond(StatusCode::OK, json!({ "id": id }));
//!         Ok(())
//!     }));
//!
//! let config = ApiConfig::default().with_base_path("/v1");
//! let mut router = ApiRouter::new(config);
//! router.load_registry(&registry)?;
//! router.set_document_file("swagger.json");
//!
//! let app = router.into_app()?;
//! assert!(app.document().route("/users/{id}", "get").is_some());
//! # Ok::<(), TenetError>(())
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → decode → route → middleware → request validator → response validator → handler
//!                                                                    ↓
//! Response ←──────────────── contract check ←────────────────────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/tenet/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod compiler;
mod discovery;
mod path;
mod sink;

pub use app::App;
pub use compiler::ApiRouter;
pub use discovery::{ControllerSource, Discovered, DiscoverySource};
pub use sink::{RouteSink, RouteTable};

// Re-export the workspace crates
pub use tenet_config as config;
pub use tenet_core as core;
pub use tenet_docs as docs;
pub use tenet_extract as extract;
pub use tenet_middleware as middleware;
pub use tenet_registry as registry;
pub use tenet_router as router;
pub use tenet_schema as schema;
pub use tenet_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust
/// use tenet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiRouter, App, ControllerSource, Discovered, DiscoverySource, RouteSink, RouteTable,
    };

    pub use tenet_config::{ApiConfig, ConfigLoader};
    pub use tenet_core::{
        BoxFuture, Context, Handler, RequestId, StatusCodes, TenetError, TenetResult,
        UploadedFile,
    };
    pub use tenet_docs::{ApiDocument, Info, ParameterIn, RouteDocument, Tag};
    pub use tenet_middleware::{FnDecorator, FnMiddleware, HandlerDecorator, Middleware, Next};
    pub use tenet_registry::{
        Controller, ControllerDeclaration, ControllerKey, MethodDeclaration, Registry,
    };
    pub use tenet_schema::{SchemaDescriptor, ValidationEngine};
    pub use tenet_telemetry::{init_logging, LogConfig};
}
