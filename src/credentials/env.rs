//! Environment variable credentials loader.

use super::MosCredentials;
use crate::error::{CredentialsError, MosError};
use std::env;

/// Environment variable holding the access key.
pub const STORAGE_ACCESS_KEY: &str = "STORAGE_ACCESS_KEY";
/// Environment variable holding the secret key.
pub const STORAGE_SECRET_KEY: &str = "STORAGE_SECRET_KEY";

/// Loads credentials from environment variables.
///
/// Defaults to `STORAGE_ACCESS_KEY` and `STORAGE_SECRET_KEY`; both names can
/// be overridden.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialsLoader {
    access_key_var: Option<String>,
    secret_key_var: Option<String>,
}

impl EnvCredentialsLoader {
    /// Create a loader with the default variable names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom variable names.
    pub fn with_vars(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: Some(access_key_var.into()),
            secret_key_var: Some(secret_key_var.into()),
        }
    }

    fn access_key_var(&self) -> &str {
        self.access_key_var.as_deref().unwrap_or(STORAGE_ACCESS_KEY)
    }

    fn secret_key_var(&self) -> &str {
        self.secret_key_var.as_deref().unwrap_or(STORAGE_SECRET_KEY)
    }

    fn read(&self, var: &str) -> Result<String, MosError> {
        let value = env::var(var).map_err(|_| CredentialsError::NotFound {
            variable: var.to_string(),
        })?;

        if value.is_empty() {
            return Err(CredentialsError::Invalid {
                message: format!("{} is empty", var),
            }
            .into());
        }

        Ok(value)
    }

    /// Read both variables and build credentials.
    pub fn load(&self) -> Result<MosCredentials, MosError> {
        let access_key = self.read(self.access_key_var())?;
        let secret_key = self.read(self.secret_key_var())?;
        Ok(MosCredentials::new(access_key, secret_key))
    }
}
