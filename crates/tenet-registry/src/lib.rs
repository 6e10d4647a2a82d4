//! # Tenet Registry
//!
//! Collects what controllers declare about their handlers, in the order
//! they declare it, until routes are compiled.
//!
//! Per controller (identified by [`ControllerKey`]) the registry keeps a
//! path prefix, the routes each handler is mounted on, and per handler a
//! [`HandlerEntry`]:
//!
//! - parameter bindings
//! - response bindings
//! - documentation [`Contributor`]s
//! - middleware that runs ahead of validation
//! - the handler itself
//!
//! Declarations are made with the builder returned by
//! [`Registry::controller`] or by implementing [`Controller`]. The
//! registry is only ever read during compilation; nothing here runs per
//! request.

#![doc(html_root_url = "https://docs.rs/tenet-registry/0.1.0")]
#![warn(missing_docs)]

pub mod contributor;
mod declare;
mod entry;
mod key;
mod registry;

pub use contributor::Contributor;
pub use declare::{ControllerDeclaration, MethodDeclaration};
pub use entry::{ControllerEntry, HandlerEntry, RouteDeclaration};
pub use key::ControllerKey;
pub use registry::{Controller, Registry};
