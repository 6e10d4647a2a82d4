//! Router errors.

use http::Method;
use thiserror::Error;

/// A route could not be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The same method is already mounted on the same path.
    #[error("{method} {path} is already mounted")]
    DuplicateRoute {
        /// Method of the rejected route.
        method: Method,
        /// Path pattern of the rejected route.
        path: String,
    },

    /// A catch-all segment was followed by further segments.
    #[error("catch-all segment must be the last segment in {path}")]
    WildcardNotLast {
        /// Offending path pattern.
        path: String,
    },

    /// Two routes name the same position differently.
    #[error("parameter :{new} in {path} conflicts with existing :{existing}")]
    ConflictingParameter {
        /// Offending path pattern.
        path: String,
        /// Name already in the tree.
        existing: String,
        /// Name in the rejected pattern.
        new: String,
    },

    /// A `:` or `*` segment without a name.
    #[error("unnamed parameter in {path}")]
    UnnamedParameter {
        /// Offending path pattern.
        path: String,
    },
}
