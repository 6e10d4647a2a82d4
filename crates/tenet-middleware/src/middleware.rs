//! Core middleware trait and types.
//!
//! Every stage of a compiled route implements [`Middleware`]. A stage gets
//! the request [`Context`] and a [`Next`] continuation; it either calls
//! `next.run(ctx)` to continue, or returns early to short-circuit the rest
//! of the chain.
//!
//! # Example
//!
//! ```
//! use tenet_core::{BoxFuture, Context, TenetResult};
//! use tenet_middleware::{Middleware, Next};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut Context,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, TenetResult<()>> {
//!         Box::pin(async move {
//!             let result = next.run(ctx).await;
//!             tracing::debug!(elapsed = ?ctx.elapsed(), "request finished");
//!             result
//!         })
//!     }
//! }
//! ```

use tenet_core::{BoxFuture, Context, TenetResult};

/// The core middleware trait.
///
/// # Invariants
///
/// - Middleware calls `next.run()` at most once
/// - Middleware does not swallow errors from downstream stages unless it
///   replaces them with its own
pub trait Middleware: Send + Sync + 'static {
    /// Name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Process the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, TenetResult<()>>;
}

/// Continuation to the rest of the chain.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    End,
}

impl<'a> Next<'a> {
    /// A continuation that runs `middleware`, then `next`.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// The continuation past the last stage. Running it does nothing.
    #[must_use]
    pub fn end() -> Self {
        Self {
            inner: NextInner::End,
        }
    }

    /// Runs the rest of the chain.
    pub async fn run(self, ctx: &mut Context) -> TenetResult<()> {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, *next).await,
            NextInner::End => Ok(()),
        }
    }
}

/// A middleware built from a closure.
///
/// ```
/// use tenet_middleware::FnMiddleware;
///
/// let logging = FnMiddleware::new("logging", |ctx, next| {
///     Box::pin(async move {
///         tracing::info!(path = %ctx.path(), "incoming request");
///         next.run(ctx).await
///     })
/// });
/// # let _ = logging;
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, TenetResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, TenetResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, TenetResult<()>> {
        (self.func)(ctx, next)
    }
}
