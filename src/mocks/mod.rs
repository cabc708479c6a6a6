//! Mock implementations for testing.
//!
//! This module provides a replaying HTTP transport, a controllable clock and
//! canned server payloads.

mod clock;
mod transport;

pub use clock::MockClock;
pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

use crate::config::MosConfig;
use crate::error::MosError;
use serde_json::json;

/// Test fixtures for storage operations.
pub struct TestFixtures;

impl TestFixtures {
    /// Base URL used by fixture configurations.
    pub const BASE_URL: &'static str = "https://storage.example.com";
    /// Project id used by fixture configurations.
    pub const PROJECT_ID: &'static str = "proj1";
    /// Bucket used by fixture configurations.
    pub const BUCKET: &'static str = "images";
    /// Access key used by fixture configurations.
    pub const ACCESS_KEY: &'static str = "MOS_test";
    /// Secret key used by fixture configurations.
    pub const SECRET_KEY: &'static str = "secret123";

    /// A configuration pointing at the fixture server.
    pub fn config() -> Result<MosConfig, MosError> {
        Self::config_for(Self::BASE_URL)
    }

    /// A configuration with fixture project, bucket and keys at `base_url`.
    pub fn config_for(base_url: &str) -> Result<MosConfig, MosError> {
        MosConfig::builder()
            .base_url(base_url)
            .project_id(Self::PROJECT_ID)
            .bucket(Self::BUCKET)
            .credentials(Self::ACCESS_KEY, Self::SECRET_KEY)
            .build()
    }

    /// Upload response body for `original_name`, stored as `stored_name`.
    pub fn file_response_json(original_name: &str, stored_name: &str) -> String {
        json!({
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "name": stored_name,
            "original_name": original_name,
            "size": 2048,
            "size_formatted": "2.0 KB",
            "mime_type": "image/jpeg",
            "bucket_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "url": format!(
                "{}/api/v1/public/projects/{}/buckets/{}/{}",
                Self::BASE_URL,
                Self::PROJECT_ID,
                Self::BUCKET,
                stored_name
            ),
            "metadata": { "owner": "tests" },
            "created_at": "2024-12-28T00:00:00Z",
            "updated_at": "2024-12-28T00:00:00Z"
        })
        .to_string()
    }

    /// Error body in the server's `{"error": ..., "message": ...}` shape.
    pub fn error_json(code: &str, message: &str) -> String {
        json!({ "error": code, "message": message }).to_string()
    }
}
