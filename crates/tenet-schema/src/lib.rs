//! # Tenet Schema
//!
//! One description of a data shape, used twice: to validate requests and
//! responses, and to document them.
//!
//! - [`SchemaDescriptor`]: the library-agnostic description
//! - [`SchemaCatalog`]: descriptors that carry an id, for reference resolution
//! - [`ValidationEngine`] / [`CompiledSchema`]: the validation-library
//!   boundary, with [`StandardEngine`] as the default implementation
//! - [`SchemaBridge`], [`to_documentation`], [`to_internal`]: translation
//!   to and from Swagger fragments
//! - [`ParameterBinding`] / [`ResponseBinding`]: descriptors attached to a
//!   request location or a response status
//!
//! ## Example
//!
//! ```
//! use tenet_schema::{NoReferences, SchemaBridge, SchemaDescriptor, ValidateOptions};
//! use tenet_docs::Definitions;
//! use serde_json::json;
//!
//! let bridge = SchemaBridge::default();
//! let page = SchemaDescriptor::object([
//!     ("limit", SchemaDescriptor::integer().max(100.0).default_value(json!(20))),
//! ]);
//!
//! let validator = bridge.to_validation(&page, &NoReferences).unwrap();
//! let value = validator.validate(&json!({}), &ValidateOptions::strict()).unwrap();
//! assert_eq!(value, json!({ "limit": 20 }));
//!
//! let mut definitions = Definitions::new();
//! let doc = bridge.to_documentation(&page, &mut definitions);
//! assert!(doc.properties.contains_key("limit"));
//! ```

mod binding;
mod bridge;
mod catalog;
mod descriptor;
mod engine;
mod error;

pub use binding::{ParameterBinding, ResponseBinding};
pub use bridge::{to_documentation, to_internal, SchemaBridge};
pub use catalog::{NoReferences, SchemaCatalog, SchemaResolver};
pub use descriptor::{Constraints, PrimitiveKind, SchemaDescriptor, SchemaKind};
pub use engine::{CompiledSchema, StandardEngine, ValidateOptions, ValidationEngine};
pub use error::{SchemaError, SchemaResult, ValidationError};
