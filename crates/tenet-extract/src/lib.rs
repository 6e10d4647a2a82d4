//! # Tenet Extract
//!
//! Turns an incoming `http::Request` into a [`tenet_core::Context`]:
//!
//! - the query string becomes `ctx.query()` (strings, repeated keys as arrays)
//! - the body becomes `ctx.body()`, decoded by content type
//! - multipart file parts become `ctx.files()`
//!
//! Path parameters are left empty; they come from the router match.
//!
//! ```rust
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use serde_json::json;
//! use tenet_extract::{decode_request, ExtractConfig};
//!
//! # tokio_test::block_on(async {
//! let request = http::Request::post("/users?notify=true")
//!     .header("content-type", "application/json")
//!     .body(Full::new(Bytes::from(r#"{"name":"Ada"}"#)))
//!     .unwrap();
//!
//! let ctx = decode_request(request, &ExtractConfig::default()).await.unwrap();
//! assert_eq!(ctx.query()["notify"], json!("true"));
//! assert_eq!(ctx.body(), &json!({ "name": "Ada" }));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/tenet-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod config;
mod error;
mod multipart;
mod query;

pub use body::decode_body;
pub use config::{ExtractConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELD_SIZE};
pub use error::ExtractError;
pub use multipart::decode_multipart;
pub use query::decode_query;

use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Full};
use tenet_core::Context;

/// Decodes `request` into a fresh [`Context`].
pub async fn decode_request(
    request: Request<Full<Bytes>>,
    config: &ExtractConfig,
) -> Result<Context, ExtractError> {
    let (parts, body) = request.into_parts();

    let query = decode_query(parts.uri.query().unwrap_or_default())?;
    let body = body
        .collect()
        .await
        .map_err(|never| -> ExtractError { match never {} })?
        .to_bytes();
    let (body, files) = decode_body(&parts.headers, body, config).await?;

    Ok(Context::new(parts.method, parts.uri.path())
        .with_headers(parts.headers)
        .with_query(query)
        .with_body(body)
        .with_files(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_multipart_request() {
        let body = multipart::tests::multipart_body(
            "bnd",
            &[
                ("name", None, b"Ada".as_slice()),
                ("avatar", Some("a.png"), b"png".as_slice()),
            ],
        );
        let request = Request::post("/users")
            .header("content-type", "multipart/form-data; boundary=bnd")
            .body(Full::new(Bytes::from(body)))
            .unwrap();

        let ctx = decode_request(request, &ExtractConfig::default()).await.unwrap();

        assert!(ctx.is_multipart());
        assert_eq!(ctx.body(), &json!({ "name": "Ada" }));
        assert_eq!(ctx.file("avatar").map(|file| file.size()), Some(3));
        assert_eq!(ctx.path(), "/users");
    }

    #[tokio::test]
    async fn test_get_without_body() {
        let request = Request::get("/search?q=a&q=b")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let ctx = decode_request(request, &ExtractConfig::default()).await.unwrap();
        assert_eq!(ctx.query()["q"], json!(["a", "b"]));
        assert_eq!(ctx.body(), &serde_json::Value::Null);
    }
}
