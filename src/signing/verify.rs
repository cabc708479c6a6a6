//! Verification of presigned URLs.
//!
//! Applies the same checks the storage server performs, in the same order:
//! unknown access key, expiry, signature, then permission for the method.
//! Rejections carry an [`ErrorResponse`] shaped like the server's so they flow
//! through the same error handling as real responses.

use super::*;
use crate::credentials::MosCredentials;
use crate::error::{AccessError, ErrorResponse};
use crate::types::{HttpMethod, Permission};
use percent_encoding::percent_decode_str;
use secrecy::{ExposeSecret, SecretString};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use url::Url;

/// A presigned request that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// Access key that signed the request.
    pub access_key: String,
    /// Method the request was signed for.
    pub method: HttpMethod,
    /// Signed resource path.
    pub path: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

struct KeyEntry {
    secret: SecretString,
    permissions: HashSet<Permission>,
}

/// Verifier for presigned URLs.
pub struct PresignedUrlVerifier {
    keys: HashMap<String, KeyEntry>,
    clock: Arc<dyn Clock>,
}

impl PresignedUrlVerifier {
    /// Create a verifier with no keys using the system clock.
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a key holding every permission.
    pub fn with_key(self, credentials: &MosCredentials) -> Self {
        self.with_key_permissions(credentials, &Permission::ALL)
    }

    /// Register a key with the given permissions.
    pub fn with_key_permissions(
        mut self,
        credentials: &MosCredentials,
        permissions: &[Permission],
    ) -> Self {
        self.keys.insert(
            credentials.access_key().to_string(),
            KeyEntry {
                secret: SecretString::new(credentials.secret_key().to_string()),
                permissions: permissions.iter().copied().collect(),
            },
        );
        self
    }

    /// Verify a presigned URL for a request made with `method`.
    pub fn verify(&self, method: HttpMethod, url: &str) -> Result<VerifiedRequest, MosError> {
        let parsed = Url::parse(url).map_err(|e| {
            rejection(401, "MISSING_PARAMETERS", &format!("malformed URL: {}", e))
        })?;

        let mut access_key = None;
        let mut expires = None;
        let mut signature = None;
        for (name, value) in parsed.query_pairs() {
            match name.as_ref() {
                ACCESS_KEY_PARAM => access_key = Some(value.into_owned()),
                EXPIRES_PARAM => expires = Some(value.into_owned()),
                SIGNATURE_PARAM => signature = Some(value.into_owned()),
                _ => {}
            }
        }

        let (access_key, expires, signature) = match (access_key, expires, signature) {
            (Some(a), Some(e), Some(s)) => (a, e, s),
            _ => {
                return Err(rejection(
                    401,
                    "MISSING_PARAMETERS",
                    "presigned URL parameters are missing",
                ))
            }
        };

        let entry = self.keys.get(&access_key).ok_or_else(|| {
            MosError::Access(AccessError::InvalidAccessKey {
                response: server_response(401, "INVALID_ACCESS_KEY", "unknown access key"),
            })
        })?;

        let expires_at: i64 = expires.parse().map_err(|_| {
            MosError::Access(AccessError::InvalidSignature {
                response: server_response(401, "INVALID_SIGNATURE", "malformed expiry"),
            })
        })?;

        if self.clock.now_unix() > expires_at {
            return Err(MosError::Access(AccessError::ExpiredSignature {
                response: server_response(401, "EXPIRED_SIGNATURE", "presigned URL has expired"),
            }));
        }

        // Signatures cover the decoded path the server routes on.
        let path = percent_decode_str(parsed.path())
            .decode_utf8()
            .map(|p| p.into_owned())
            .ok()
            .filter(|path| {
                signature_matches(
                    entry.secret.expose_secret(),
                    method.as_str(),
                    path,
                    expires_at,
                    &signature,
                )
                .unwrap_or(false)
            })
            .ok_or_else(|| {
                MosError::Access(AccessError::InvalidSignature {
                    response: server_response(401, "INVALID_SIGNATURE", "signature does not match"),
                })
            })?;

        let required = method.required_permission();
        if !entry.permissions.contains(&required) {
            return Err(MosError::Access(AccessError::PermissionDenied {
                response: server_response(
                    403,
                    "PERMISSION_DENIED",
                    &format!("access key lacks {} permission", required.as_str()),
                ),
            }));
        }

        Ok(VerifiedRequest {
            access_key,
            method,
            path,
            expires_at,
        })
    }
}

impl Default for PresignedUrlVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PresignedUrlVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresignedUrlVerifier")
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .field("clock", &self.clock)
            .finish()
    }
}

fn server_response(status: u16, code: &str, message: &str) -> ErrorResponse {
    ErrorResponse::new(
        status,
        serde_json::json!({ "code": code, "message": message }).to_string(),
    )
}

fn rejection(status: u16, code: &str, message: &str) -> MosError {
    MosError::Access(AccessError::AccessDenied {
        response: server_response(status, code, message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(i64);

    impl Clock for Fixed {
        fn now_unix(&self) -> i64 {
            self.0
        }
    }

    const PATH: &str = "/api/v1/projects/proj1/buckets/images/objects/a.jpg";

    fn credentials() -> MosCredentials {
        MosCredentials::new("MOS_test", "secret123")
    }

    fn signed_url(method: HttpMethod) -> String {
        MosSigner::new("https://storage.example.com", credentials())
            .presign_until(method, PATH, 1_700_000_000)
            .unwrap()
            .into_string()
    }

    fn verifier(now: i64) -> PresignedUrlVerifier {
        PresignedUrlVerifier::new()
            .with_clock(Arc::new(Fixed(now)))
            .with_key(&credentials())
    }

    #[test]
    fn test_accepts_valid_url() {
        let verified = verifier(1_699_999_000)
            .verify(HttpMethod::Get, &signed_url(HttpMethod::Get))
            .unwrap();
        assert_eq!(verified.access_key, "MOS_test");
        assert_eq!(verified.path, PATH);
        assert_eq!(verified.expires_at, 1_700_000_000);
    }

    #[test]
    fn test_accepts_at_exact_expiry() {
        assert!(verifier(1_700_000_000)
            .verify(HttpMethod::Get, &signed_url(HttpMethod::Get))
            .is_ok());
    }

    #[test]
    fn test_rejects_expired() {
        let err = verifier(1_700_000_001)
            .verify(HttpMethod::Get, &signed_url(HttpMethod::Get))
            .unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::ExpiredSignature { .. })));
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.error_code(), Some("EXPIRED_SIGNATURE"));
    }

    #[test]
    fn test_rejects_method_swap() {
        let err = verifier(0)
            .verify(HttpMethod::Delete, &signed_url(HttpMethod::Get))
            .unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::InvalidSignature { .. })));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let verifier = PresignedUrlVerifier::new()
            .with_clock(Arc::new(Fixed(0)))
            .with_key(&MosCredentials::new("MOS_other", "secret123"));
        let err = verifier
            .verify(HttpMethod::Get, &signed_url(HttpMethod::Get))
            .unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::InvalidAccessKey { .. })));
    }

    #[test]
    fn test_rejects_missing_permission() {
        let verifier = PresignedUrlVerifier::new()
            .with_clock(Arc::new(Fixed(0)))
            .with_key_permissions(&credentials(), &[Permission::Read]);

        assert!(verifier
            .verify(HttpMethod::Get, &signed_url(HttpMethod::Get))
            .is_ok());

        let err = verifier
            .verify(HttpMethod::Delete, &signed_url(HttpMethod::Delete))
            .unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::PermissionDenied { .. })));
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn test_rejects_missing_parameters() {
        let err = verifier(0)
            .verify(HttpMethod::Get, &format!("https://storage.example.com{}", PATH))
            .unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::AccessDenied { .. })));
    }

    #[test]
    fn test_accepts_path_with_spaces() {
        let path = "/api/v1/projects/proj1/buckets/images/objects/photo (1).jpg";
        let url = MosSigner::new("https://storage.example.com", credentials())
            .presign_until(HttpMethod::Get, path, 1_700_000_000)
            .unwrap()
            .into_string();

        let verified = verifier(0).verify(HttpMethod::Get, &url).unwrap();
        assert_eq!(verified.path, path);
    }

    #[test]
    fn test_rejects_undecodable_path() {
        let url = signed_url(HttpMethod::Get).replace("a.jpg", "%FF.jpg");
        let err = verifier(0).verify(HttpMethod::Get, &url).unwrap_err();
        assert!(matches!(err, MosError::Access(AccessError::InvalidSignature { .. })));
    }
}
