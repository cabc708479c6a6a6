//! Integration tests for presigned URL signing and verification.

use mos_storage::error::AccessError;
use mos_storage::mocks::MockClock;
use mos_storage::signing::{
    build_string_to_sign, compute_signature, signature_matches, MosSigner, PresignedUrlVerifier,
    UrlSigner,
};
use mos_storage::types::{HttpMethod, Permission};
use mos_storage::{object_path, public_object_url, MosCredentials, MosError};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

const BASE: &str = "https://storage.example.com";
const PATH: &str = "/api/v1/projects/proj1/buckets/images/objects/a.jpg";
const EXPIRES: i64 = 1_700_000_000;

fn credentials() -> MosCredentials {
    MosCredentials::new("MOS_test", "secret123")
}

fn signer(clock: Arc<MockClock>) -> MosSigner {
    MosSigner::new(BASE, credentials()).with_clock(clock)
}

fn verifier(clock: Arc<MockClock>) -> PresignedUrlVerifier {
    PresignedUrlVerifier::new()
        .with_clock(clock)
        .with_key(&credentials())
}

#[test]
fn test_fixed_vector() {
    assert_eq!(
        build_string_to_sign("GET", PATH, EXPIRES).unwrap(),
        "GET\n/api/v1/projects/proj1/buckets/images/objects/a.jpg\n1700000000"
    );
    assert_eq!(
        compute_signature("secret123", "GET", PATH, EXPIRES).unwrap(),
        "JUtf2f7kkwivZkCNXXL-KDgroYZTNrGFmkrIi0XRgMQ="
    );
}

#[test]
fn test_fixed_vector_uuid_project() {
    assert_eq!(
        compute_signature(
            "unit_test_fake_secret",
            "GET",
            "/api/v1/projects/uuid/buckets/images/objects/photo.jpg",
            1_735_344_000,
        )
        .unwrap(),
        "h1iKBvy9bXsso5oYMJ72fk9VcfNS4GBg9cVha30BxxQ="
    );
}

#[test_case("other-secret", "GET", PATH, EXPIRES ; "secret")]
#[test_case("secret123", "DELETE", PATH, EXPIRES ; "method")]
#[test_case("secret123", "GET", "/api/v1/projects/proj1/buckets/images/objects/b.jpg", EXPIRES ; "path")]
#[test_case("secret123", "GET", PATH, EXPIRES + 1 ; "expiry")]
fn test_signature_sensitive_to(secret: &str, method: &str, path: &str, expires_at: i64) {
    let baseline = compute_signature("secret123", "GET", PATH, EXPIRES).unwrap();
    let changed = compute_signature(secret, method, path, expires_at).unwrap();
    assert_ne!(baseline, changed);
}

#[test_case("" ; "empty method")]
#[test_case("get" ; "lowercase method")]
#[test_case("G ET" ; "method with space")]
fn test_rejects_bad_method(method: &str) {
    let err = compute_signature("secret123", method, PATH, EXPIRES).unwrap_err();
    assert!(matches!(err, MosError::Signing(_)));
}

#[test]
fn test_url_structure() {
    let signer = signer(Arc::new(MockClock::new(EXPIRES - 3600)));
    let presigned = signer
        .presign(HttpMethod::Get, PATH, Duration::from_secs(3600))
        .unwrap();

    let url = url::Url::parse(presigned.as_str()).unwrap();
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host_str(), Some("storage.example.com"));
    assert_eq!(url.path(), PATH);

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("X-Mos-AccessKey".to_string(), "MOS_test".to_string()),
            ("X-Mos-Expires".to_string(), "1700000000".to_string()),
            (
                "X-Mos-Signature".to_string(),
                "JUtf2f7kkwivZkCNXXL-KDgroYZTNrGFmkrIi0XRgMQ=".to_string()
            ),
        ]
    );
    assert!(presigned.as_str().ends_with("%3D"));
}

#[test]
fn test_public_url_is_pure() {
    let url = public_object_url(BASE, "proj1", "images", "a.jpg");
    assert_eq!(
        url,
        "https://storage.example.com/api/v1/public/projects/proj1/buckets/images/a.jpg"
    );
    assert!(!url.contains('?'));
    assert!(!url.contains("X-Mos"));
    assert_eq!(url, public_object_url(BASE, "proj1", "images", "a.jpg"));
}

#[test]
fn test_path_templates() {
    assert_eq!(object_path("p", "b", Some("f.txt")), "/api/v1/projects/p/buckets/b/objects/f.txt");
    assert_eq!(object_path("p", "b", None), "/api/v1/projects/p/buckets/b/objects");
}

#[test]
fn test_round_trip_all_methods() {
    let clock = Arc::new(MockClock::new(EXPIRES - 60));
    let signer = signer(clock.clone());
    let verifier = verifier(clock);

    for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete] {
        let presigned = signer
            .presign(method, PATH, Duration::from_secs(60))
            .unwrap();
        let verified = verifier.verify(method, presigned.as_str()).unwrap();
        assert_eq!(verified.method, method);
        assert_eq!(verified.path, PATH);
        assert_eq!(verified.expires_at, EXPIRES);
    }
}

#[test]
fn test_expiry_enforced_with_mock_clock() {
    let clock = Arc::new(MockClock::new(EXPIRES - 10));
    let signer = signer(clock.clone());
    let verifier = verifier(clock.clone());

    let presigned = signer
        .presign(HttpMethod::Get, PATH, Duration::from_secs(10))
        .unwrap();
    assert!(verifier.verify(HttpMethod::Get, presigned.as_str()).is_ok());

    clock.advance(Duration::from_secs(10));
    assert!(verifier.verify(HttpMethod::Get, presigned.as_str()).is_ok());
    assert!(!presigned.is_expired_at(EXPIRES));

    clock.advance(Duration::from_secs(1));
    let err = verifier
        .verify(HttpMethod::Get, presigned.as_str())
        .unwrap_err();
    assert!(matches!(err, MosError::Access(AccessError::ExpiredSignature { .. })));
    assert!(presigned.is_expired_at(EXPIRES + 1));
}

#[test]
fn test_tampering_rejected() {
    let clock = Arc::new(MockClock::new(EXPIRES - 60));
    let url = signer(clock.clone())
        .presign_until(HttpMethod::Get, PATH, EXPIRES)
        .unwrap()
        .into_string();
    let verifier = verifier(clock);

    let tampered_path = url.replace("a.jpg", "b.jpg");
    let tampered_expiry = url.replace("X-Mos-Expires=1700000000", "X-Mos-Expires=1800000000");

    for candidate in [tampered_path, tampered_expiry] {
        let err = verifier.verify(HttpMethod::Get, &candidate).unwrap_err();
        assert!(
            matches!(err, MosError::Access(AccessError::InvalidSignature { .. })),
            "{:?}",
            err
        );
    }

    let err = verifier.verify(HttpMethod::Post, &url).unwrap_err();
    assert!(matches!(err, MosError::Access(AccessError::InvalidSignature { .. })));
}

#[test]
fn test_permission_per_method() {
    let clock = Arc::new(MockClock::new(EXPIRES - 60));
    let signer = signer(clock.clone());
    let verifier = PresignedUrlVerifier::new()
        .with_clock(clock)
        .with_key_permissions(&credentials(), &[Permission::Read, Permission::Write]);

    let upload = signer
        .presign_until(HttpMethod::Post, "/api/v1/projects/proj1/buckets/images/objects", EXPIRES)
        .unwrap();
    assert!(verifier.verify(HttpMethod::Post, upload.as_str()).is_ok());

    let delete = signer
        .presign_until(HttpMethod::Delete, PATH, EXPIRES)
        .unwrap();
    let err = verifier
        .verify(HttpMethod::Delete, delete.as_str())
        .unwrap_err();
    assert!(matches!(err, MosError::Access(AccessError::PermissionDenied { .. })));
    assert_eq!(err.status_code(), Some(403));
}

#[test]
fn test_signer_is_shareable_across_threads() {
    let signer: Arc<dyn UrlSigner> = Arc::new(signer(Arc::new(MockClock::new(EXPIRES - 60))));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signer = signer.clone();
            std::thread::spawn(move || {
                signer
                    .presign_until(HttpMethod::Get, PATH, EXPIRES)
                    .unwrap()
                    .into_string()
            })
        })
        .collect();

    let urls: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(urls.windows(2).all(|w| w[0] == w[1]));
}

fn method_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("GET"), Just("POST"), Just("DELETE")]
}

proptest! {
    #[test]
    fn prop_signature_is_deterministic(
        secret in "[ -~]{1,32}",
        method in method_strategy(),
        path in "/[A-Za-z0-9._~-]{1,24}(/[A-Za-z0-9._~-]{1,24}){0,4}",
        expires_at in 1i64..=4_102_444_800,
    ) {
        let first = compute_signature(&secret, method, &path, expires_at).unwrap();
        let second = compute_signature(&secret, method, &path, expires_at).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 44);
        prop_assert!(!first.contains('+') && !first.contains('/'));
        prop_assert!(signature_matches(&secret, method, &path, expires_at, &first).unwrap());
    }

    #[test]
    fn prop_expiry_is_floored(now in 1i64..2_000_000_000, millis in 1_000u64..10_000_000) {
        let clock = Arc::new(MockClock::new(now));
        let presigned = signer(clock)
            .presign(HttpMethod::Get, PATH, Duration::from_millis(millis))
            .unwrap();
        prop_assert_eq!(presigned.expires_at, now + (millis / 1000) as i64);
    }
}
