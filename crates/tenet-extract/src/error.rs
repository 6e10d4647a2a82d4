//! Decoding errors.

use http::StatusCode;
use tenet_core::TenetError;
use thiserror::Error;

/// The request could not be decoded.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The query string is not valid `application/x-www-form-urlencoded`.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A JSON body failed to parse.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A form body failed to parse.
    #[error("invalid form body: {0}")]
    InvalidForm(String),

    /// A text body is not UTF-8.
    #[error("request body is not valid UTF-8")]
    InvalidUtf8,

    /// The content type header is unusable.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// A multipart body is malformed or exceeds its limits.
    #[error("multipart error: {0}")]
    Multipart(String),

    /// The body is larger than allowed.
    #[error("request body too large: {actual} bytes (limit {limit})")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
        /// Actual size in bytes.
        actual: usize,
    },
}

impl ExtractError {
    /// HTTP status to answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ExtractError> for TenetError {
    fn from(error: ExtractError) -> Self {
        TenetError::http(error.status_code(), error.to_string())
    }
}
