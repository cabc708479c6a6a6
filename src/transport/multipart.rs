//! Multipart/form-data body encoding.
//!
//! Bodies are built in memory so the transport stays body-agnostic: the form
//! yields a `Content-Type` header value and the encoded bytes.

use bytes::{BufMut, Bytes, BytesMut};

/// A multipart/form-data form.
pub struct MultipartForm {
    boundary: String,
    parts: Vec<MultipartPart>,
}

struct MultipartPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl MultipartForm {
    /// Creates a new form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("----MosFormBoundary{}", uuid::Uuid::new_v4().simple()))
    }

    /// Creates a new form with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// The boundary separating parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Adds a plain text field.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart {
            name: name.to_string(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Adds a file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: Bytes) -> Self {
        self.parts.push(MultipartPart {
            name: name.to_string(),
            filename: Some(filename.to_string()),
            content_type: Some(content_type.to_string()),
            data,
        });
        self
    }

    /// Builds the form, returning the content-type header and body.
    pub fn build(self) -> (String, Bytes) {
        let size: usize = self
            .parts
            .iter()
            .map(|p| p.data.len() + self.boundary.len() + 128)
            .sum();
        let mut body = BytesMut::with_capacity(size + self.boundary.len() + 8);

        for part in &self.parts {
            body.put_slice(b"--");
            body.put_slice(self.boundary.as_bytes());
            body.put_slice(b"\r\n");

            body.put_slice(b"Content-Disposition: form-data; name=\"");
            body.put_slice(escape_quotes(&part.name).as_bytes());
            body.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                body.put_slice(b"; filename=\"");
                body.put_slice(escape_quotes(filename).as_bytes());
                body.put_slice(b"\"");
            }
            body.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                body.put_slice(b"Content-Type: ");
                body.put_slice(content_type.as_bytes());
                body.put_slice(b"\r\n");
            }
            body.put_slice(b"\r\n");

            body.put_slice(&part.data);
            body.put_slice(b"\r\n");
        }

        body.put_slice(b"--");
        body.put_slice(self.boundary.as_bytes());
        body.put_slice(b"--\r\n");

        let content_type = format!("multipart/form-data; boundary={}", self.boundary);
        (content_type, body.freeze())
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
