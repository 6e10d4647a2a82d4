//! The terminal stage: the route handler, optionally wrapped by a decorator.

use crate::middleware::{Middleware, Next};
use std::fmt;
use std::sync::Arc;
use tenet_core::{BoxFuture, Context, Handler, TenetResult};

/// Wraps every handler of a controller.
///
/// A decorator receives the raw handler, the request context, the
/// continuation past the handler stage and the route summary. It decides
/// whether and how the handler runs, which makes it the hook for
/// cross-cutting instrumentation.
pub trait HandlerDecorator: Send + Sync + 'static {
    /// Runs `handler` for the request in `ctx`.
    fn decorate<'a>(
        &'a self,
        handler: &'a dyn Handler,
        ctx: &'a mut Context,
        next: Next<'a>,
        summary: &'a str,
    ) -> BoxFuture<'a, TenetResult<()>>;
}

/// A [`HandlerDecorator`] built from a closure.
///
/// ```
/// use tenet_middleware::FnDecorator;
///
/// let audited = FnDecorator::new(|handler, ctx, _next, summary| {
///     Box::pin(async move {
///         tracing::info!(summary, "calling handler");
///         handler.call(ctx).await
///     })
/// });
/// # let _ = audited;
/// ```
pub struct FnDecorator<F> {
    func: F,
}

impl<F> FnDecorator<F>
where
    F: for<'a> Fn(
            &'a dyn Handler,
            &'a mut Context,
            Next<'a>,
            &'a str,
        ) -> BoxFuture<'a, TenetResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a decorator from `func`.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> HandlerDecorator for FnDecorator<F>
where
    F: for<'a> Fn(
            &'a dyn Handler,
            &'a mut Context,
            Next<'a>,
            &'a str,
        ) -> BoxFuture<'a, TenetResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn decorate<'a>(
        &'a self,
        handler: &'a dyn Handler,
        ctx: &'a mut Context,
        next: Next<'a>,
        summary: &'a str,
    ) -> BoxFuture<'a, TenetResult<()>> {
        (self.func)(handler, ctx, next, summary)
    }
}

/// Runs the route handler.
#[derive(Clone)]
pub struct HandlerStage {
    handler: Arc<dyn Handler>,
    decorator: Option<Arc<dyn HandlerDecorator>>,
    summary: String,
}

impl fmt::Debug for HandlerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerStage")
            .field("summary", &self.summary)
            .field("decorated", &self.decorator.is_some())
            .finish_non_exhaustive()
    }
}

impl HandlerStage {
    /// A stage running `handler` directly.
    #[must_use]
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            decorator: None,
            summary: String::new(),
        }
    }

    /// Routes the call through `decorator`.
    #[must_use]
    pub fn with_decorator(mut self, decorator: Arc<dyn HandlerDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Route summary handed to the decorator.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// The route summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

impl Middleware for HandlerStage {
    fn name(&self) -> &'static str {
        "handler"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, TenetResult<()>> {
        match &self.decorator {
            Some(decorator) => decorator.decorate(self.handler.as_ref(), ctx, next, &self.summary),
            None => self.handler.call(ctx),
        }
    }
}
