//! High-level router API.

use http::Method;

use crate::error::RouterError;
use crate::node::Node;
use crate::{Lookup, RouteMatch};

/// A radix tree router mounting one `T` per (method, path).
///
/// # Route Priority
///
/// When several patterns could match a path:
///
/// 1. **Static segments** (e.g., `/users/me`)
/// 2. **Parameter segments** (e.g., `/users/:id`)
/// 3. **Catch-all segments** (e.g., `/files/*path`)
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Mounts `value` for `method` at the pattern `path`.
    ///
    /// ```rust
    /// use tenet_router::Router;
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.insert(Method::GET, "/users/:id", "show").unwrap();
    /// assert!(router.insert(Method::GET, "/users/:id", "again").is_err());
    /// ```
    pub fn insert(&mut self, method: Method, path: &str, value: T) -> Result<(), RouterError> {
        self.root.insert(path, method, value)?;
        self.route_count += 1;
        Ok(())
    }

    /// Looks up `method` on the concrete `path`.
    ///
    /// ```rust
    /// use tenet_router::{Lookup, Router};
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.insert(Method::GET, "/users/:id", "show").unwrap();
    ///
    /// let Lookup::Found(found) = router.lookup(&Method::GET, "/users/7") else {
    ///     panic!("expected a match");
    /// };
    /// assert_eq!(*found.value, "show");
    /// assert_eq!(found.params.get("id"), Some("7"));
    ///
    /// assert!(matches!(
    ///     router.lookup(&Method::POST, "/users/7"),
    ///     Lookup::MethodNotAllowed { .. }
    /// ));
    /// assert!(matches!(router.lookup(&Method::GET, "/posts"), Lookup::NotFound));
    /// ```
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, T> {
        let Some((methods, params)) = self.root.match_path(path) else {
            return Lookup::NotFound;
        };
        match methods.get(method) {
            Some(value) => Lookup::Found(RouteMatch { value, params }),
            None if methods.is_empty() => Lookup::NotFound,
            None => Lookup::MethodNotAllowed {
                allowed: methods.allowed(),
            },
        }
    }

    /// Returns the number of mounted routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
