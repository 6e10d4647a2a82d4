//! Per-route middleware chains.
//!
//! A [`Chain`] is assembled once, at compile time, and run for every
//! request that reaches the route. The stage order is fixed by
//! [`ChainBuilder`]: external middleware first, then request validation,
//! then response validation, then the handler. Calling the builder methods
//! in a different order does not change it.

use crate::middleware::{Middleware, Next};
use crate::stages::{HandlerStage, RequestValidator, ResponseValidator};
use std::fmt;
use std::sync::Arc;
use tenet_core::{Context, TenetResult};

/// An executable middleware chain.
#[derive(Clone, Default)]
pub struct Chain {
    stages: Vec<Arc<dyn Middleware>>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Chain {
    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Runs the request in `ctx` through every stage.
    pub async fn run(&self, ctx: &mut Context) -> TenetResult<()> {
        self.build_next().run(ctx).await
    }

    // Built from back to front so the first stage runs first.
    fn build_next(&self) -> Next<'_> {
        let mut next = Next::end();
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Names of the stages, in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Builder for a [`Chain`].
#[derive(Default)]
pub struct ChainBuilder {
    external: Vec<Arc<dyn Middleware>>,
    request: Option<RequestValidator>,
    response: Option<ResponseValidator>,
    handler: Option<HandlerStage>,
}

impl ChainBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an external middleware. These run ahead of validation, in
    /// the order they were added.
    #[must_use]
    pub fn middleware<M: Middleware>(self, middleware: M) -> Self {
        self.shared_middleware(Arc::new(middleware))
    }

    /// Appends an already shared external middleware.
    #[must_use]
    pub fn shared_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.external.push(middleware);
        self
    }

    /// Sets the request validation stage.
    #[must_use]
    pub fn request_validator(mut self, validator: RequestValidator) -> Self {
        self.request = Some(validator);
        self
    }

    /// Sets the response validation stage.
    #[must_use]
    pub fn response_validator(mut self, validator: ResponseValidator) -> Self {
        self.response = Some(validator);
        self
    }

    /// Sets the terminal handler stage.
    #[must_use]
    pub fn handler(mut self, handler: HandlerStage) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> Chain {
        let mut stages = self.external;
        if let Some(request) = self.request {
            stages.push(Arc::new(request));
        }
        if let Some(response) = self.response {
            stages.push(Arc::new(response));
        }
        if let Some(handler) = self.handler {
            stages.push(Arc::new(handler));
        }
        Chain { stages }
    }
}
