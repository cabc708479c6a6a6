//! Request types for object operations.

use super::common::*;
use bytes::Bytes;
use std::time::Duration;

/// Content type used for uploaded file parts when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Options shared by the upload operations.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Metadata to attach to the object.
    pub metadata: Option<Metadata>,
    /// Lifetime of the presigned upload URL. Falls back to the client default.
    pub expires_in: Option<Duration>,
    /// Content type of the file part. Defaults to `application/octet-stream`.
    pub content_type: Option<String>,
}

impl UploadOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the metadata map.
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the upload URL lifetime.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Set the content type of the file part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Request to upload an in-memory object.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Filename sent in the multipart part. The server assigns the stored name.
    pub filename: String,
    /// Object content.
    pub body: Bytes,
    /// Upload options.
    pub options: UploadOptions,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(filename: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            body: body.into(),
            options: UploadOptions::default(),
        }
    }

    /// Replace the upload options.
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// Add one metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options = self.options.with_metadata(key, value);
        self
    }

    /// Set the upload URL lifetime.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.options.expires_in = Some(expires_in);
        self
    }

    /// Set the content type of the file part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.options.content_type = Some(content_type.into());
        self
    }

    /// Content type that will be sent for the file part.
    pub fn content_type(&self) -> &str {
        self.options
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_builder() {
        let request = UploadRequest::new("hello.txt", Bytes::from_static(b"Hello, World!"))
            .with_metadata("type", "text")
            .with_metadata("pages", 3)
            .with_expires_in(Duration::from_secs(600));

        assert_eq!(request.filename, "hello.txt");
        assert_eq!(request.content_type(), DEFAULT_CONTENT_TYPE);
        assert_eq!(request.options.expires_in, Some(Duration::from_secs(600)));

        let metadata = request.options.metadata.unwrap();
        assert_eq!(metadata["type"], "text");
        assert_eq!(metadata["pages"], 3);
    }

    #[test]
    fn test_upload_options_default() {
        let options = UploadOptions::new();
        assert!(options.metadata.is_none());
        assert!(options.expires_in.is_none());
        assert!(options.content_type.is_none());
    }
}
