//! The terminal step of a route.

use crate::{Context, TenetResult};
use std::future::Future;
use std::pin::Pin;

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A route handler.
///
/// Handlers read the (already validated) request from the [`Context`] and
/// write the response back into it. Any closure with the right shape is a
/// handler:
///
/// ```
/// use tenet_core::{Context, Handler, TenetResult, BoxFuture};
/// use http::StatusCode;
/// use serde_json::json;
///
/// fn get_user(ctx: &mut Context) -> BoxFuture<'_, TenetResult<()>> {
///     Box::pin(async move {
///         let id = ctx.params().get("id").cloned();
///         ctx.respond(StatusCode::OK, json!({ "id": id }));
///         Ok(())
///     })
/// }
///
/// fn assert_handler<H: Handler>(_: H) {}
/// assert_handler(get_user);
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles the request held by `ctx`.
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, TenetResult<()>>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, TenetResult<()>> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, TenetResult<()>> {
        (self)(ctx)
    }
}
