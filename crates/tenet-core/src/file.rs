//! Uploaded file parts.

use bytes::Bytes;
use serde_json::{json, Value};

/// A file part received in a `multipart/form-data` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    /// Creates a new uploaded file.
    #[must_use]
    pub fn new(field: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            field: field.into(),
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Sets the client-provided file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the part's content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Form field the file was sent under.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Client-provided file name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Content type of the part.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw file contents.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// JSON view merged into validated form data.
    ///
    /// The contents are not included, only metadata.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "fieldname": self.field,
            "originalname": self.file_name,
            "mimetype": self.content_type,
            "size": self.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_view() {
        let file = UploadedFile::new("avatar", Bytes::from_static(b"\x89PNG"))
            .with_file_name("me.png")
            .with_content_type("image/png");

        let value = file.to_value();
        assert_eq!(value["fieldname"], "avatar");
        assert_eq!(value["originalname"], "me.png");
        assert_eq!(value["mimetype"], "image/png");
        assert_eq!(value["size"], 4);
    }
}
