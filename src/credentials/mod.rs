//! Access key / secret key credentials.
//!
//! The access key is a public identifier that travels in every presigned URL.
//! The secret key never leaves the process: it is only used as the HMAC key.

mod env;

pub use env::{EnvCredentialsLoader, STORAGE_ACCESS_KEY, STORAGE_SECRET_KEY};

use crate::error::{CredentialsError, MosError};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Storage credentials.
#[derive(Clone)]
pub struct MosCredentials {
    access_key: String,
    secret_key: SecretString,
}

impl MosCredentials {
    /// Create new credentials.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::new(secret_key.into()),
        }
    }

    /// Load credentials from `STORAGE_ACCESS_KEY` and `STORAGE_SECRET_KEY`.
    pub fn from_env() -> Result<Self, MosError> {
        EnvCredentialsLoader::new().load()
    }

    /// Get the access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Get the secret key.
    ///
    /// Note: This exposes the secret. Use carefully and avoid logging.
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Check that both halves are present.
    pub fn validate(&self) -> Result<(), MosError> {
        if self.access_key.is_empty() {
            return Err(CredentialsError::Invalid {
                message: "access key is empty".to_string(),
            }
            .into());
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(CredentialsError::Invalid {
                message: "secret key is empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for MosCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = MosCredentials::new("MOS_test", "secret123");
        assert_eq!(creds.access_key(), "MOS_test");
        assert_eq!(creds.secret_key(), "secret123");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = MosCredentials::new("MOS_test", "super-secret-value");
        let debug = format!("{:?}", creds);

        assert!(debug.contains("MOS_test"));
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(MosCredentials::new("", "secret").validate().is_err());
        assert!(MosCredentials::new("MOS_test", "").validate().is_err());
    }
}
