//! Radix tree router for Tenet.
//!
//! Compiled routes are mounted here by the route compiler. Patterns use the
//! router's native placeholder syntax: `:name` captures one segment,
//! `*name` captures the rest of the path.
//!
//! ```rust
//! use tenet_router::{Lookup, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(Method::GET, "/v1/users", "list").unwrap();
//! router.insert(Method::GET, "/v1/users/:id", "show").unwrap();
//! router.insert(Method::GET, "/assets/*path", "asset").unwrap();
//!
//! match router.lookup(&Method::GET, "/assets/css/site.css") {
//!     Lookup::Found(found) => assert_eq!(found.params.get("path"), Some("css/site.css")),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!             "v1"         "assets"
//!              │               │
//!           "users"          "*path"
//!          [GET]  │
//!               ":id"
//!               [GET]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;

pub use error::RouterError;
pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

use http::Method;

/// A matched route with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The mounted value.
    pub value: &'a T,
    /// Captured path parameters.
    pub params: Params,
}

/// Outcome of [`Router::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// Path and method matched.
    Found(RouteMatch<'a, T>),
    /// The path matched, but not for this method.
    MethodNotAllowed {
        /// Methods mounted on the path.
        allowed: Vec<Method>,
    },
    /// Nothing is mounted on the path.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router<&'static str> {
        let mut router = Router::new();
        router.insert(Method::GET, "/users", "list").unwrap();
        router.insert(Method::POST, "/users", "create").unwrap();
        router.insert(Method::GET, "/orgs/:org/users/:id", "member").unwrap();
        router
    }

    #[test]
    fn test_method_routing() {
        let router = router();
        assert_eq!(router.len(), 3);

        match router.lookup(&Method::POST, "/users") {
            Lookup::Found(found) => assert_eq!(*found.value, "create"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            router.lookup(&Method::DELETE, "/users"),
            Lookup::MethodNotAllowed {
                allowed: vec![Method::GET, Method::POST]
            }
        );
    }

    #[test]
    fn test_multiple_params() {
        let router = router();
        let Lookup::Found(found) = router.lookup(&Method::GET, "/orgs/acme/users/7") else {
            panic!("expected a match");
        };
        assert_eq!(found.params.get("org"), Some("acme"));
        assert_eq!(found.params.get("id"), Some("7"));
    }

    #[test]
    fn test_intermediate_node_is_not_found() {
        let router = router();
        assert_eq!(router.lookup(&Method::GET, "/orgs/acme"), Lookup::NotFound);
        assert!(Router::<()>::new().is_empty());
    }
}
