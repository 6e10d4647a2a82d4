//! Schema error types.

use thiserror::Error;

/// Result type for schema compilation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while turning a descriptor into something usable.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema registered as a definition has no id.
    #[error("schema has no id; cannot file it as a definition")]
    MissingId,

    /// A reference names an id nothing registered.
    #[error("reference to unknown schema '{id}'")]
    UnresolvedReference {
        /// The missing id.
        id: String,
    },

    /// A schema reaches itself through references.
    #[error("schema '{id}' references itself")]
    CircularReference {
        /// The id on the cycle.
        id: String,
    },

    /// An array declared without an item schema.
    #[error("array at '{path}' has no item schema")]
    MalformedArray {
        /// Location inside the descriptor.
        path: String,
    },

    /// A string pattern that is not a valid regex.
    #[error("invalid pattern '{pattern}' at '{path}': {source}")]
    InvalidPattern {
        /// Location inside the descriptor.
        path: String,
        /// The rejected pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
}

/// A value failed validation.
///
/// The message is meant for clients and already names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (`params.id`, `body.items[2]`).
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// Create an error for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SchemaError::UnresolvedReference { id: "User".into() }.to_string(),
            "reference to unknown schema 'User'"
        );
        assert_eq!(
            ValidationError::new("params.id", "\"params.id\" is required").to_string(),
            "\"params.id\" is required"
        );
    }
}
