//! Decoding limits.

/// Default maximum body size (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum size of one multipart field (5 MiB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 5 * 1024 * 1024;

/// Limits applied while decoding a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Maximum size of one multipart field in bytes.
    pub max_field_size: usize,
    /// Maximum number of multipart fields.
    pub max_fields: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: 100,
        }
    }
}

impl ExtractConfig {
    /// Default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Sets the maximum multipart field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Sets the maximum number of multipart fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}
