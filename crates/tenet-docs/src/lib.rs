//! # Tenet Docs
//!
//! The Swagger 2.0 document model produced by route compilation.
//!
//! - [`ApiDocument`]: the aggregated document, served verbatim as JSON
//! - [`RouteDocument`]: one `(path, verb)` operation
//! - [`DocSchema`]: a documentation schema fragment
//! - [`Definitions`]: the shared `#/definitions` table
//!
//! Nothing in this crate knows how fragments are produced; that is the
//! schema bridge's job. The types here only fix the wire shape.
//!
//! ## Example
//!
//! ```
//! use tenet_docs::{ApiDocument, Info, RouteDocument};
//!
//! let mut doc = ApiDocument::new(Info::new("Users API", "2.1.0"));
//! doc.record_route("/users/{id}", "get", RouteDocument::default().with_summary("Fetch a user"));
//!
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("\"swagger\":\"2.0\""));
//! assert!(json.contains("/users/{id}"));
//! ```

mod document;
mod error;
mod route;
mod schema;

pub use document::{ApiDocument, Contact, ExternalDocumentation, Info, License, Tag};
pub use error::{DocsError, DocsResult};
pub use route::{ParameterDoc, ParameterIn, ResponseDoc, RouteDocument, SecurityRequirement};
pub use schema::{DefinitionChange, Definitions, DocSchema, DocType, Required, DEFINITIONS_PREFIX};
