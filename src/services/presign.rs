//! Presign service for generating presigned URLs.

use super::validate_filename;
use crate::config::MosConfig;
use crate::error::MosError;
use crate::signing::UrlSigner;
use crate::types::{HttpMethod, PresignedUrl};
use std::sync::Arc;
use std::time::Duration;

/// Service for generating presigned and public URLs for the configured bucket.
///
/// Every `expires_in` argument falls back to the configured default lifetime
/// when `None`.
pub struct PresignService {
    config: Arc<MosConfig>,
    signer: Arc<dyn UrlSigner>,
}

impl PresignService {
    /// Create a new presign service.
    pub fn new(config: Arc<MosConfig>, signer: Arc<dyn UrlSigner>) -> Self {
        Self { config, signer }
    }

    /// Presign an arbitrary resource path.
    pub fn presign(
        &self,
        method: HttpMethod,
        path: &str,
        expires_in: Option<Duration>,
    ) -> Result<PresignedUrl, MosError> {
        self.signer.presign(method, path, self.lifetime(expires_in))
    }

    /// Presign an arbitrary resource path until an absolute unix time.
    pub fn presign_until(
        &self,
        method: HttpMethod,
        path: &str,
        expires_at: i64,
    ) -> Result<PresignedUrl, MosError> {
        self.signer.presign_until(method, path, expires_at)
    }

    /// Presigned GET URL for downloading `filename`.
    pub fn get_object_url(
        &self,
        filename: &str,
        expires_in: Option<Duration>,
    ) -> Result<PresignedUrl, MosError> {
        validate_filename(filename)?;
        self.presign(
            HttpMethod::Get,
            &self.config.object_path(Some(filename)),
            expires_in,
        )
    }

    /// Presigned POST URL for uploading into the bucket.
    pub fn upload_object_url(&self, expires_in: Option<Duration>) -> Result<PresignedUrl, MosError> {
        self.presign(HttpMethod::Post, &self.config.object_path(None), expires_in)
    }

    /// Presigned DELETE URL for `filename`.
    pub fn delete_object_url(
        &self,
        filename: &str,
        expires_in: Option<Duration>,
    ) -> Result<PresignedUrl, MosError> {
        validate_filename(filename)?;
        self.presign(
            HttpMethod::Delete,
            &self.config.object_path(Some(filename)),
            expires_in,
        )
    }

    /// Unauthenticated URL of `filename`.
    ///
    /// Carries no signature and no expiry; anyone holding it can read the
    /// object.
    pub fn public_object_url(&self, filename: &str) -> Result<String, MosError> {
        validate_filename(filename)?;
        Ok(self.config.public_object_url(filename))
    }

    /// The lifetime applied when `expires_in` is `None`.
    pub fn default_expires_in(&self) -> Duration {
        self.config.default_expires_in
    }

    fn lifetime(&self, expires_in: Option<Duration>) -> Duration {
        expires_in.unwrap_or(self.config.default_expires_in)
    }
}

impl std::fmt::Debug for PresignService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresignService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockClock, TestFixtures};
    use crate::signing::MosSigner;

    fn create_service(now: i64) -> PresignService {
        let config = Arc::new(TestFixtures::config().unwrap());
        let signer = MosSigner::new(&config.base_url, config.credentials.clone())
            .with_clock(Arc::new(MockClock::new(now)));
        PresignService::new(config, Arc::new(signer))
    }

    #[test]
    fn test_get_object_url_matches_known_vector() {
        let service = create_service(1_700_000_000 - 3600);
        let presigned = service.get_object_url("a.jpg", None).unwrap();
        assert_eq!(presigned.expires_at, 1_700_000_000);
        assert!(presigned
            .url
            .ends_with("X-Mos-Signature=JUtf2f7kkwivZkCNXXL-KDgroYZTNrGFmkrIi0XRgMQ%3D"));
    }

    #[test]
    fn test_upload_url_targets_collection() {
        let service = create_service(1_700_000_000 - 60);
        let presigned = service
            .upload_object_url(Some(Duration::from_secs(60)))
            .unwrap();
        assert_eq!(presigned.method, HttpMethod::Post);
        assert_eq!(presigned.path, "/api/v1/projects/proj1/buckets/images/objects");
        assert!(presigned
            .url
            .ends_with("X-Mos-Signature=y6y3FmNwOfnKRViIh_7bEqFg1Gc6VfJRhDBQg17Lzbc%3D"));
    }

    #[test]
    fn test_delete_url() {
        let service = create_service(1_700_000_000 - 3600);
        let presigned = service.delete_object_url("a.jpg", None).unwrap();
        assert!(presigned
            .url
            .ends_with("X-Mos-Signature=5WwzFn4OrcNnjke3HgwQaj1FsAOGMVb3wjQuSvi5-10%3D"));
    }

    #[test]
    fn test_public_url_has_no_query() {
        let service = create_service(0);
        let url = service.public_object_url("a.jpg").unwrap();
        assert_eq!(
            url,
            "https://storage.example.com/api/v1/public/projects/proj1/buckets/images/a.jpg"
        );
    }

    #[test]
    fn test_rejects_bad_filename() {
        let service = create_service(1000);
        assert!(service.get_object_url("", None).is_err());
        assert!(service.delete_object_url("a/b.jpg", None).is_err());
        assert!(service.public_object_url("a?b").is_err());
    }

    #[test]
    fn test_zero_lifetime_rejected() {
        let service = create_service(1000);
        assert!(service
            .get_object_url("a.jpg", Some(Duration::ZERO))
            .is_err());
    }
}
