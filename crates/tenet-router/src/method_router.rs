//! Per-path method table.

use http::Method;

/// The values mounted on one path, keyed by HTTP method.
///
/// ```rust
/// use tenet_router::MethodRouter;
/// use http::Method;
///
/// let mut methods = MethodRouter::new();
/// methods.insert(Method::GET, "show").unwrap();
/// methods.insert(Method::DELETE, "destroy").unwrap();
///
/// assert_eq!(methods.get(&Method::GET), Some(&"show"));
/// assert_eq!(methods.get(&Method::POST), None);
/// assert_eq!(methods.allowed(), vec![Method::GET, Method::DELETE]);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: Vec<(Method, T)>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `value` for `method`.
    ///
    /// Hands `value` back if the method is already taken.
    pub fn insert(&mut self, method: Method, value: T) -> Result<(), T> {
        if self.contains(&method) {
            return Err(value);
        }
        self.entries.push((method, value));
        Ok(())
    }

    /// Value mounted for `method`.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, value)| value)
    }

    /// Returns true if `method` is mounted.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.entries.iter().any(|(m, _)| m == method)
    }

    /// Mounted methods, in mount order.
    #[must_use]
    pub fn allowed(&self) -> Vec<Method> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Number of mounted methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
