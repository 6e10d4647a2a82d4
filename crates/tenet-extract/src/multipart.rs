//! `multipart/form-data` decoding.
//!
//! Text parts become fields of the body object. Parts that carry a file
//! name become [`UploadedFile`]s.

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::query::push_value;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::io;
use tenet_core::UploadedFile;

/// Splits a multipart body into text fields and uploaded files.
pub async fn decode_multipart(
    content_type: &str,
    body: Bytes,
    config: &ExtractConfig,
) -> Result<(Map<String, Value>, Vec<UploadedFile>), ExtractError> {
    let boundary = multer::parse_boundary(content_type).map_err(|_| {
        ExtractError::InvalidContentType(
            "missing or invalid boundary in multipart content type".to_string(),
        )
    })?;

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Map::new();
    let mut files = Vec::new();
    let mut count = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractError::Multipart(e.to_string()))?
    {
        count += 1;
        if count > config.max_fields {
            return Err(ExtractError::Multipart(format!(
                "too many fields (max {})",
                config.max_fields
            )));
        }

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ExtractError::Multipart(format!("failed to read field: {e}")))?;

        if data.len() > config.max_field_size {
            return Err(ExtractError::PayloadTooLarge {
                limit: config.max_field_size,
                actual: data.len(),
            });
        }

        match file_name {
            Some(file_name) => {
                let mut file = UploadedFile::new(name, data).with_file_name(file_name);
                if let Some(content_type) = content_type {
                    file = file.with_content_type(content_type);
                }
                files.push(file);
            }
            None => {
                let text = String::from_utf8(data.to_vec()).map_err(|_| ExtractError::InvalidUtf8)?;
                push_value(&mut fields, name, Value::String(text));
            }
        }
    }

    Ok((fields, files))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn multipart_body(
        boundary: &str,
        parts: &[(&str, Option<&str>, &[u8])],
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match file_name {
                Some(file_name) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: image/png\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                }
                None => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn test_fields_and_files() {
        let body = multipart_body(
            "XYZ",
            &[
                ("name", None, b"Ada".as_slice()),
                ("avatar", Some("ada.png"), b"\x89PNG".as_slice()),
            ],
        );

        let (fields, files) = decode_multipart(
            "multipart/form-data; boundary=XYZ",
            Bytes::from(body),
            &ExtractConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(fields["name"], json!("Ada"));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].field(), "avatar");
        assert_eq!(files[0].file_name(), Some("ada.png"));
        assert_eq!(files[0].content_type(), Some("image/png"));
        assert_eq!(files[0].size(), 4);
    }

    #[tokio::test]
    async fn test_field_limit() {
        let body = multipart_body("B", &[("a", None, b"1".as_slice()), ("b", None, b"2".as_slice())]);
        let err = decode_multipart(
            "multipart/form-data; boundary=B",
            Bytes::from(body),
            &ExtractConfig::new().max_fields(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractError::Multipart(_)));
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let err = decode_multipart("multipart/form-data", Bytes::new(), &ExtractConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidContentType(_)));
    }
}
