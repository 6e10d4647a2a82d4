//! Per-controller and per-handler declaration state.

use crate::contributor::Contributor;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tenet_core::Handler;
use tenet_docs::{Definitions, RouteDocument};
use tenet_middleware::Middleware;
use tenet_schema::{ParameterBinding, ResponseBinding};

/// Everything declared for one handler method.
///
/// Grows by appending only; nothing is reordered or deduplicated.
#[derive(Default, Clone)]
pub struct HandlerEntry {
    pub(crate) parameters: Vec<ParameterBinding>,
    pub(crate) responses: Vec<ResponseBinding>,
    pub(crate) contributors: Vec<Contributor>,
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
    pub(crate) handler: Option<Arc<dyn Handler>>,
}

impl HandlerEntry {
    /// Parameter bindings, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterBinding] {
        &self.parameters
    }

    /// Response bindings, in declaration order. A later binding for a status
    /// overrides an earlier one.
    #[must_use]
    pub fn responses(&self) -> &[ResponseBinding] {
        &self.responses
    }

    /// Documentation contributors, in declaration order.
    #[must_use]
    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    /// Middleware that runs ahead of the validators.
    #[must_use]
    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    /// The handler, once one is registered.
    #[must_use]
    pub fn handler(&self) -> Option<&Arc<dyn Handler>> {
        self.handler.as_ref()
    }

    /// Runs every contributor over a default fragment.
    pub fn document(&self, definitions: &mut Definitions) -> RouteDocument {
        let mut doc = RouteDocument::default();
        for contribute in &self.contributors {
            doc = contribute(doc, definitions);
        }
        doc
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("parameters", &self.parameters)
            .field("responses", &self.responses)
            .field("contributors", &self.contributors.len())
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// A `(path, verb)` a handler is mounted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    /// Path template relative to the controller prefix, `{name}` placeholders.
    pub path: String,
    /// Lower-case verb, e.g. `get`.
    pub verb: String,
    /// Handler method key.
    pub method_key: String,
}

/// Everything declared for one controller type.
#[derive(Debug, Clone)]
pub struct ControllerEntry {
    pub(crate) name: &'static str,
    pub(crate) prefix: String,
    pub(crate) declared: bool,
    pub(crate) handlers: IndexMap<String, HandlerEntry>,
    pub(crate) routes: IndexMap<(String, String), String>,
}

impl ControllerEntry {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            prefix: String::new(),
            declared: false,
            handlers: IndexMap::new(),
            routes: IndexMap::new(),
        }
    }

    /// Controller name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Path prefix shared by every route of the controller.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The entry for `method_key`.
    #[must_use]
    pub fn handler(&self, method_key: &str) -> Option<&HandlerEntry> {
        self.handlers.get(method_key)
    }

    /// Every handler entry, in first-touch order.
    pub fn handlers(&self) -> impl Iterator<Item = (&str, &HandlerEntry)> {
        self.handlers.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Every declared route, grouped by path in first-declaration order.
    pub fn routes(&self) -> Vec<RouteDeclaration> {
        let mut grouped: IndexMap<&str, Vec<RouteDeclaration>> = IndexMap::new();
        for ((path, verb), method_key) in &self.routes {
            grouped
                .entry(path.as_str())
                .or_default()
                .push(RouteDeclaration {
                    path: path.clone(),
                    verb: verb.clone(),
                    method_key: method_key.clone(),
                });
        }
        grouped.into_values().flatten().collect()
    }

    pub(crate) fn handler_mut(&mut self, method_key: &str) -> &mut HandlerEntry {
        self.handlers.entry(method_key.to_string()).or_default()
    }
}
