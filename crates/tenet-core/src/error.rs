//! Error types for Tenet.
//!
//! [`TenetError`] covers the three failure families of a declaration-driven
//! API:
//!
//! | Family | Variant | Status |
//! |---|---|---|
//! | Declaration mistakes found at startup | `Declaration` | 500 (never served) |
//! | Requests that violate a declared parameter | `Validation` | 400 |
//! | Handlers whose output violates a declared response | `ResponseContract` | 500 |
//!
//! Dispatch failures (`NotFound`, `MethodNotAllowed`), explicit handler
//! failures (`Http`) and opaque `Internal` errors complete the set.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`TenetError`].
pub type TenetResult<T> = Result<T, TenetError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A request did not satisfy the declared parameters.
    Validation,
    /// A response did not satisfy the declared response schema.
    ResponseContract,
    /// A route or schema declaration is unusable.
    Declaration,
    /// No route matched the request path.
    NotFound,
    /// The path matched but not for this method.
    MethodNotAllowed,
    /// A handler failed with an explicit status.
    Http,
    /// Anything else.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ResponseContract | Self::Declaration | Self::Http | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Standard error type for Tenet.
///
/// # Example
///
/// ```
/// use tenet_core::{TenetError, ErrorCategory};
///
/// let err = TenetError::validation("\"params.id\" is required");
/// assert_eq!(err.category(), ErrorCategory::Validation);
/// assert_eq!(err.message(), "\"params.id\" is required");
/// ```
#[derive(Error, Debug)]
pub enum TenetError {
    /// Request validation failed.
    #[error("{message}")]
    Validation {
        /// Message produced by the validation engine.
        message: String,
    },

    /// The handler produced a response that violates its declaration.
    #[error("{message}")]
    ResponseContract {
        /// Message produced by the validation engine.
        message: String,
        /// Status the handler attempted to answer with.
        status: StatusCode,
    },

    /// A declaration is unusable (missing id, unsupported kind, ...).
    #[error("declaration error: {message}")]
    Declaration {
        /// Description of the mistake.
        message: String,
    },

    /// No route matches the request path.
    #[error("{message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// A route exists for the path but not for the method.
    #[error("{message}")]
    MethodNotAllowed {
        /// Human-readable error message.
        message: String,
        /// Methods the path does accept.
        allowed: Vec<String>,
    },

    /// A handler failed with an explicit status code.
    #[error("{message}")]
    Http {
        /// Status to answer with.
        status: StatusCode,
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl TenetError {
    /// Creates a request validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a response contract error.
    #[must_use]
    pub fn response_contract(message: impl Into<String>, status: StatusCode) -> Self {
        Self::ResponseContract {
            message: message.into(),
            status,
        }
    }

    /// Creates a declaration error.
    #[must_use]
    pub fn declaration(message: impl Into<String>) -> Self {
        Self::Declaration {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a method not allowed error.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>, allowed: Vec<String>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            allowed,
        }
    }

    /// Creates an error answered with an explicit status.
    ///
    /// Client statuses keep their message; server statuses are still
    /// reported with the given message, so handlers should not put
    /// internal details in it.
    #[must_use]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::ResponseContract { .. } => ErrorCategory::ResponseContract,
            Self::Declaration { .. } => ErrorCategory::Declaration,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::Http { .. } => ErrorCategory::Http,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Http { status, .. } => *status,
            _ => self.category().default_status_code(),
        }
    }

    /// Returns the bare message, without the category prefix some variants
    /// carry in their `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::ResponseContract { message, .. }
            | Self::Declaration { message }
            | Self::NotFound { message }
            | Self::MethodNotAllowed { message, .. }
            | Self::Http { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Converts this error to a serializable error envelope.
    ///
    /// Internal errors never expose their message to clients.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        let message = match self {
            Self::Internal { .. } | Self::Declaration { .. } => {
                "Internal Server Error".to_string()
            }
            other => other.message().to_string(),
        };

        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                category: self.category(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ResponseContract { .. } => "RESPONSE_CONTRACT_VIOLATION",
            Self::Declaration { .. } => "DECLARATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Serializable body written for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details.
    pub error: ErrorDetail,
    /// Request identifier for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error details inside an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TenetError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TenetError::response_contract("x", StatusCode::OK).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TenetError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TenetError::method_not_allowed("x", vec!["GET".into()]).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            TenetError::http(StatusCode::CONFLICT, "taken").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_display_is_bare_message() {
        let err = TenetError::validation("\"query.limit\" must be a number");
        assert_eq!(err.to_string(), "\"query.limit\" must be a number");
    }

    #[test]
    fn test_envelope_carries_message_and_request_id() {
        let err = TenetError::validation("\"params.id\" is required");
        let envelope = err.to_envelope(Some("req-1"));

        assert_eq!(envelope.error.code, "VALIDATION_ERROR");
        assert_eq!(envelope.error.message, "\"params.id\" is required");
        assert_eq!(envelope.error.category, ErrorCategory::Validation);
        assert_eq!(envelope.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_envelope_hides_internal_details() {
        let err = TenetError::internal_with_source(
            "database password rejected",
            std::io::Error::other("boom"),
        );
        let envelope = err.to_envelope(None);

        assert_eq!(envelope.error.message, "Internal Server Error");
        assert!(envelope.request_id.is_none());
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = TenetError::not_found("no route for /x").to_envelope(None);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["error"]["category"], "not_found");
        assert!(json.get("request_id").is_none());
    }
}
