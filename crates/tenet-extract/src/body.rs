//! Body decoding by content type.

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::multipart::decode_multipart;
use crate::query::decode_query;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde_json::Value;
use tenet_core::UploadedFile;

/// Decodes `body` according to the request's content type.
///
/// | Content type | Result |
/// |---|---|
/// | `application/json`, `*/*+json` | parsed JSON |
/// | `application/x-www-form-urlencoded` | object of strings |
/// | `multipart/form-data` | object of text fields, plus files |
/// | `text/*` | string |
/// | anything else, or an empty body | `null` |
pub async fn decode_body(
    headers: &HeaderMap,
    body: Bytes,
    config: &ExtractConfig,
) -> Result<(Value, Vec<UploadedFile>), ExtractError> {
    if body.len() > config.max_body_size {
        return Err(ExtractError::PayloadTooLarge {
            limit: config.max_body_size,
            actual: body.len(),
        });
    }
    if body.is_empty() {
        return Ok((Value::Null, Vec::new()));
    }

    let Some(raw) = headers.get(CONTENT_TYPE) else {
        return Ok((Value::Null, Vec::new()));
    };
    let raw = raw
        .to_str()
        .map_err(|_| ExtractError::InvalidContentType("non-ASCII content type".to_string()))?;
    let content_type: mime::Mime = raw
        .parse()
        .map_err(|_| ExtractError::InvalidContentType(raw.to_string()))?;

    let (kind, subtype) = (content_type.type_(), content_type.subtype());
    let value = if (kind == mime::APPLICATION && subtype == mime::JSON)
        || content_type.suffix() == Some(mime::JSON)
    {
        serde_json::from_slice(&body)?
    } else if kind == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED {
        let text = std::str::from_utf8(&body).map_err(|_| ExtractError::InvalidUtf8)?;
        Value::Object(decode_query(text).map_err(|e| ExtractError::InvalidForm(e.to_string()))?)
    } else if kind == mime::MULTIPART && subtype == mime::FORM_DATA {
        let (fields, files) = decode_multipart(raw, body, config).await?;
        return Ok((Value::Object(fields), files));
    } else if kind == mime::TEXT {
        Value::String(String::from_utf8(body.to_vec()).map_err(|_| ExtractError::InvalidUtf8)?)
    } else {
        Value::Null
    };

    Ok((value, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    async fn decode(content_type: &'static str, body: &'static str) -> Result<Value, ExtractError> {
        decode_body(&headers(content_type), Bytes::from(body), &ExtractConfig::default())
            .await
            .map(|(value, _)| value)
    }

    #[tokio::test]
    async fn test_json() {
        let value = decode("application/json; charset=utf-8", r#"{"a":1}"#).await.unwrap();
        assert_eq!(value, json!({ "a": 1 }));

        let value = decode("application/vnd.api+json", "[1]").await.unwrap();
        assert_eq!(value, json!([1]));

        let err = decode("application/json", "{").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_form() {
        let value = decode("application/x-www-form-urlencoded", "name=Ada&age=36")
            .await
            .unwrap();
        assert_eq!(value, json!({ "name": "Ada", "age": "36" }));
    }

    #[tokio::test]
    async fn test_text_and_unknown() {
        assert_eq!(decode("text/plain", "hi").await.unwrap(), json!("hi"));
        assert_eq!(
            decode("application/octet-stream", "\u{1}").await.unwrap(),
            Value::Null
        );
    }

    #[tokio::test]
    async fn test_empty_and_oversized() {
        assert_eq!(decode("application/json", "").await.unwrap(), Value::Null);

        let err = decode_body(
            &headers("text/plain"),
            Bytes::from_static(b"abcdef"),
            &ExtractConfig::new().max_body_size(3),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractError::PayloadTooLarge { limit: 3, actual: 6 }));
    }
}
