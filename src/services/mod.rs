//! Storage service implementations.
//!
//! This module provides service implementations for the storage API:
//! - Objects: upload, download and delete over presigned URLs
//! - Presign: generate presigned and public URLs

mod objects;
mod presign;

pub use objects::ObjectsService;
pub use presign::PresignService;

use crate::error::{MosError, RequestError};

/// Check that `filename` is usable as a single path segment.
///
/// Path segments are inserted without escaping, so anything that would change
/// the URL structure is rejected. `%` is rejected since the server decodes the
/// request path before checking the signature.
pub fn validate_filename(filename: &str) -> Result<(), MosError> {
    let reason = if filename.is_empty() {
        Some("must not be empty")
    } else if filename == "." || filename == ".." {
        Some("must not be a relative path component")
    } else if filename.contains('/') || filename.contains('\\') {
        Some("must not contain path separators")
    } else if filename.contains('?') || filename.contains('#') {
        Some("must not contain '?' or '#'")
    } else if filename.contains('%') {
        Some("must not contain '%'")
    } else if filename.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RequestError::InvalidFilename {
            filename: filename.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}
