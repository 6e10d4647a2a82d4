//! # Tenet Middleware
//!
//! The executable side of a route declaration.
//!
//! Every mounted route runs one [`Chain`] with a fixed stage order:
//!
//! ```text
//! Request → [external middleware] → RequestValidation → ResponseValidation → Handler
//!                                                               ↓
//! Response ←────────────────────── (checked against the declared status) ┘
//! ```
//!
//! | Stage | Type | Purpose |
//! |-------|------|---------|
//! | 1 | any [`Middleware`] | Caller-supplied middleware, in registration order |
//! | 2 | [`RequestValidator`] | Validates params, query, body and form data in one pass |
//! | 3 | [`ResponseValidator`] | Runs the handler, then validates what it produced |
//! | 4 | [`HandlerStage`] | The handler, optionally wrapped by a [`HandlerDecorator`] |
//!
//! [`ValidationSynthesizer`] builds stages 2 and 3 from a handler's
//! parameter and response bindings.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenet_core::{BoxFuture, Context, TenetResult};
//! use tenet_docs::ParameterIn;
//! use tenet_middleware::{Chain, HandlerStage, ValidationSynthesizer};
//! use tenet_schema::{NoReferences, ParameterBinding, SchemaDescriptor};
//!
//! fn show(ctx: &mut Context) -> BoxFuture<'_, TenetResult<()>> {
//!     Box::pin(async move {
//!         let id = ctx.params()["id"].clone();
//!         ctx.set_response_body(id);
//!         Ok(())
//!     })
//! }
//!
//! let synthesizer = ValidationSynthesizer::default();
//! let bindings = [ParameterBinding::new("id", ParameterIn::Path, SchemaDescriptor::integer())];
//!
//! let chain = Chain::builder()
//!     .request_validator(synthesizer.request_validator(&bindings, &NoReferences))
//!     .handler(HandlerStage::new(Arc::new(show)))
//!     .build();
//!
//! assert_eq!(chain.stage_names(), vec!["request_validation", "handler"]);
//! ```

#![doc(html_root_url = "https://docs.rs/tenet-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;
mod synthesizer;

pub use chain::{Chain, ChainBuilder};
pub use middleware::{FnMiddleware, Middleware, Next};
pub use stages::{FnDecorator, HandlerDecorator, HandlerStage, RequestValidator, ResponseValidator};
pub use synthesizer::ValidationSynthesizer;
