//! Where compiled routes are mounted.

use http::Method;
use tenet_middleware::Chain;
use tenet_router::{Lookup, Router, RouterError};

/// The router boundary: anything that can mount a chain on a verb and path.
///
/// Paths use the `:name` placeholder syntax. Implement this to compile
/// routes onto a router other than [`RouteTable`].
pub trait RouteSink {
    /// Mounts `chain` for `verb` at `path`.
    fn register(&mut self, verb: Method, path: &str, chain: Chain) -> Result<(), RouterError>;
}

/// The built-in route table, backed by `tenet-router`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    router: Router<Chain>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the chain for `method` and `path`.
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, Chain> {
        self.router.lookup(method, path)
    }

    /// Number of mounted routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Returns `true` if nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }
}

impl RouteSink for RouteTable {
    fn register(&mut self, verb: Method, path: &str, chain: Chain) -> Result<(), RouterError> {
        self.router.insert(verb, path, chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_mount_rejected() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/users/:id", Chain::default()).unwrap();
        let err = table
            .register(Method::GET, "/users/:id", Chain::default())
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_distinguishes_method_not_allowed() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/users/:id", Chain::default()).unwrap();

        assert!(matches!(
            table.lookup(&Method::GET, "/users/3"),
            Lookup::Found(_)
        ));
        assert!(matches!(
            table.lookup(&Method::POST, "/users/3"),
            Lookup::MethodNotAllowed { .. }
        ));
        assert!(matches!(table.lookup(&Method::GET, "/teams"), Lookup::NotFound));
    }
}
