//! Presigned URL signing.
//!
//! A presigned URL carries three query parameters: the access key, the expiry
//! as unix seconds, and an HMAC-SHA256 signature over
//!
//! ```text
//! {METHOD}\n{PATH}\n{EXPIRES}
//! ```
//!
//! keyed with the raw UTF-8 bytes of the secret key. The digest is encoded as
//! padded URL-safe base64 and then query-escaped. The server recomputes the
//! same payload, so every byte of it is part of the wire contract.

mod canonical;
mod clock;
mod signer;
mod verify;

pub use canonical::{
    build_string_to_sign, expires_at_from, validate_expires_at, validate_method, validate_path,
};
pub use clock::{Clock, SystemClock};
pub use signer::{MosSigner, UrlSigner};
pub use verify::{PresignedUrlVerifier, VerifiedRequest};

use crate::error::{MosError, SigningError};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the access key.
pub const ACCESS_KEY_PARAM: &str = "X-Mos-AccessKey";

/// Query parameter carrying the expiry as unix seconds.
pub const EXPIRES_PARAM: &str = "X-Mos-Expires";

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "X-Mos-Signature";

/// Characters that should NOT be percent-encoded in query values.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query parameter value.
pub fn uri_encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET).to_string()
}

fn new_mac(key: &[u8]) -> Result<HmacSha256, MosError> {
    HmacSha256::new_from_slice(key).map_err(|e| {
        MosError::Signing(SigningError::CalculationFailed {
            message: e.to_string(),
        })
    })
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], MosError> {
    let mut mac = new_mac(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Encode a raw digest as padded URL-safe base64.
pub fn encode_signature(digest: &[u8]) -> String {
    URL_SAFE.encode(digest)
}

/// Compute the signature for a request.
///
/// Rejects an empty or non-token method, a path that is empty or does not
/// start with `/`, and a non-positive expiry.
pub fn compute_signature(
    secret_key: &str,
    method: &str,
    path: &str,
    expires_at: i64,
) -> Result<String, MosError> {
    let payload = build_string_to_sign(method, path, expires_at)?;
    let digest = hmac_sha256(secret_key.as_bytes(), payload.as_bytes())?;
    Ok(encode_signature(&digest))
}

/// Check a signature in constant time.
///
/// Returns `false` for malformed base64 as well as for a mismatch.
pub fn signature_matches(
    secret_key: &str,
    method: &str,
    path: &str,
    expires_at: i64,
    signature: &str,
) -> Result<bool, MosError> {
    let payload = build_string_to_sign(method, path, expires_at)?;
    let provided = match URL_SAFE.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    let mut mac = new_mac(secret_key.as_bytes())?;
    mac.update(payload.as_bytes());
    Ok(mac.verify_slice(&provided).is_ok())
}
