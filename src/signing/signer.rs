//! Presigned URL signer implementation.

use super::*;
use crate::credentials::MosCredentials;
use crate::types::{HttpMethod, PresignedUrl};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Trait for presigned URL signers.
pub trait UrlSigner: Send + Sync {
    /// Access key embedded in produced URLs.
    fn access_key(&self) -> &str;

    /// Current unix time as seen by the signer.
    fn now_unix(&self) -> i64;

    /// Compute the signature for `(method, path, expires_at)`.
    fn signature(&self, method: &str, path: &str, expires_at: i64) -> Result<String, MosError>;

    /// Create a presigned URL valid until the absolute unix time `expires_at`.
    fn presign_until(
        &self,
        method: HttpMethod,
        path: &str,
        expires_at: i64,
    ) -> Result<PresignedUrl, MosError>;

    /// Create a presigned URL valid for `expires_in`, floored to whole seconds.
    fn presign(
        &self,
        method: HttpMethod,
        path: &str,
        expires_in: Duration,
    ) -> Result<PresignedUrl, MosError> {
        let expires_at = expires_at_from(self.now_unix(), expires_in)?;
        self.presign_until(method, path, expires_at)
    }
}

/// HMAC-SHA256 presigned URL signer.
///
/// Holds only immutable data and can be shared freely across tasks.
#[derive(Clone)]
pub struct MosSigner {
    base_url: String,
    credentials: MosCredentials,
    clock: Arc<dyn Clock>,
}

impl MosSigner {
    /// Create a new signer using the system clock.
    ///
    /// A trailing `/` on `base_url` is dropped so that `base_url + path` never
    /// doubles the slash.
    pub fn new(base_url: impl Into<String>, credentials: MosCredentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL the signer prefixes to every path.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn assemble(&self, path: &str, expires_at: i64, signature: &str) -> String {
        format!(
            "{}{}?{}={}&{}={}&{}={}",
            self.base_url,
            path,
            ACCESS_KEY_PARAM,
            self.credentials.access_key(),
            EXPIRES_PARAM,
            expires_at,
            SIGNATURE_PARAM,
            uri_encode_query(signature),
        )
    }
}

impl UrlSigner for MosSigner {
    fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    fn now_unix(&self) -> i64 {
        self.clock.now_unix()
    }

    fn signature(&self, method: &str, path: &str, expires_at: i64) -> Result<String, MosError> {
        compute_signature(self.credentials.secret_key(), method, path, expires_at)
    }

    fn presign_until(
        &self,
        method: HttpMethod,
        path: &str,
        expires_at: i64,
    ) -> Result<PresignedUrl, MosError> {
        let signature = self.signature(method.as_str(), path, expires_at)?;
        let url = self.assemble(path, expires_at, &signature);

        debug!(
            method = %method,
            path,
            expires_at,
            access_key = self.credentials.access_key(),
            "presigned URL"
        );

        Ok(PresignedUrl {
            url,
            method,
            path: path.to_string(),
            expires_at,
        })
    }
}

impl std::fmt::Debug for MosSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MosSigner")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("clock", &self.clock)
            .finish()
    }
}
