//! Canonical signing payload.

use crate::error::{MosError, SigningError};
use std::time::Duration;

fn invalid(argument: &'static str, message: impl Into<String>) -> MosError {
    MosError::Signing(SigningError::InvalidArgument {
        argument,
        message: message.into(),
    })
}

/// Validate an HTTP method token: non-empty ASCII uppercase letters.
pub fn validate_method(method: &str) -> Result<(), MosError> {
    if method.is_empty() {
        return Err(invalid("method", "must not be empty"));
    }
    if !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(invalid(
            "method",
            format!("'{}' is not an uppercase method token", method),
        ));
    }
    Ok(())
}

/// Validate a resource path.
///
/// The path must start with `/`. Control characters, `?` and `#` are rejected
/// since they would change either the payload layout or the URL structure.
pub fn validate_path(path: &str) -> Result<(), MosError> {
    if path.is_empty() {
        return Err(invalid("path", "must not be empty"));
    }
    if !path.starts_with('/') {
        return Err(invalid("path", format!("'{}' must start with '/'", path)));
    }
    if let Some(c) = path
        .chars()
        .find(|c| c.is_control() || *c == '?' || *c == '#')
    {
        return Err(invalid(
            "path",
            format!("contains forbidden character {:?}", c),
        ));
    }
    Ok(())
}

/// Validate an absolute expiry in unix seconds.
pub fn validate_expires_at(expires_at: i64) -> Result<(), MosError> {
    if expires_at <= 0 {
        return Err(invalid(
            "expires_at",
            format!("{} is not a positive unix timestamp", expires_at),
        ));
    }
    Ok(())
}

/// Absolute expiry for a lifetime starting at `now_unix`.
///
/// The lifetime is floored to whole seconds and must be at least one second.
pub fn expires_at_from(now_unix: i64, expires_in: Duration) -> Result<i64, MosError> {
    let seconds = expires_in.as_secs();
    if seconds == 0 {
        return Err(invalid(
            "expires_in",
            format!("{:?} is shorter than one second", expires_in),
        ));
    }

    i64::try_from(seconds)
        .ok()
        .and_then(|s| now_unix.checked_add(s))
        .ok_or_else(|| invalid("expires_in", format!("{:?} overflows the expiry", expires_in)))
}

/// Build the string to sign.
///
/// Format (no trailing newline):
/// ```text
/// HTTPMethod\n
/// ResourcePath\n
/// ExpiresAt
/// ```
pub fn build_string_to_sign(method: &str, path: &str, expires_at: i64) -> Result<String, MosError> {
    validate_method(method)?;
    validate_path(path)?;
    validate_expires_at(expires_at)?;

    Ok(format!("{}\n{}\n{}", method, path, expires_at))
}
