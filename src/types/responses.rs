//! Response types for object operations.

use super::common::*;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Object metadata returned by the server after an upload.
///
/// `url` and `name` carry the server-assigned stored filename; the original
/// filename is only kept for reference and cannot be used to fetch the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResponse {
    /// Object id.
    pub id: String,
    /// Stored filename assigned by the server.
    pub name: String,
    /// Filename as uploaded.
    #[serde(default)]
    pub original_name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Human readable size, e.g. "1.2 MB".
    #[serde(default)]
    pub size_formatted: String,
    /// MIME type detected by the server.
    #[serde(default)]
    pub mime_type: String,
    /// Bucket id.
    #[serde(default)]
    pub bucket_id: String,
    /// Absolute, ready-to-use access URL.
    pub url: String,
    /// Metadata attached at upload time.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp as sent by the server.
    #[serde(default)]
    pub updated_at: String,
}

impl FileResponse {
    /// Parse `created_at` as RFC 3339.
    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parse `updated_at` as RFC 3339.
    pub fn updated_at_datetime(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// A presigned URL together with what it was signed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// The complete URL.
    pub url: String,
    /// HTTP method the URL is valid for.
    pub method: HttpMethod,
    /// Resource path that was signed.
    pub path: String,
    /// Expiry as unix-epoch seconds.
    pub expires_at: i64,
}

impl PresignedUrl {
    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Consume and return the URL string.
    pub fn into_string(self) -> String {
        self.url
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Check whether the URL has expired at the given unix time.
    ///
    /// A URL is still valid in the second it expires.
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        now_unix > self.expires_at
    }

    /// Check if the URL has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<chrono::Duration> {
        let remaining = self.expires_at - Utc::now().timestamp();
        if remaining > 0 {
            Some(chrono::Duration::seconds(remaining))
        } else {
            None
        }
    }
}

impl fmt::Display for PresignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl AsRef<str> for PresignedUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl From<PresignedUrl> for String {
    fn from(url: PresignedUrl) -> Self {
        url.url
    }
}

/// Downloaded object content.
#[derive(Debug, Clone)]
pub struct ObjectBody {
    /// Object bytes.
    pub body: Bytes,
    /// Content type reported by the server.
    pub content_type: Option<String>,
    /// Content length reported by the server.
    pub content_length: Option<u64>,
}
