//! Configuration types for the storage client.
//!
//! This module provides the `MosConfig` type: where the server lives, which
//! project and bucket the client works against, the credentials used to sign
//! URLs, and transport tuning.

use crate::credentials::{MosCredentials, STORAGE_ACCESS_KEY, STORAGE_SECRET_KEY};
use crate::error::{ConfigurationError, CredentialsError, MosError};
use crate::paths;
use std::time::Duration;
use url::Url;

/// Environment variable holding the server base URL.
pub const STORAGE_BASE_URL: &str = "STORAGE_BASE_URL";
/// Environment variable holding the project id.
pub const STORAGE_PROJECT_ID: &str = "STORAGE_PROJECT_ID";
/// Environment variable holding the bucket name.
pub const STORAGE_BUCKET: &str = "STORAGE_BUCKET";
/// Environment variable overriding the default presigned URL lifetime, in seconds.
pub const MOS_DEFAULT_EXPIRES_SECS: &str = "MOS_DEFAULT_EXPIRES_SECS";
/// Environment variable overriding the read timeout, in milliseconds.
pub const MOS_TIMEOUT_MS: &str = "MOS_TIMEOUT_MS";

/// Lifetime used for presigned URLs when the caller does not pass one.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3600);

/// Configuration for the storage client.
#[derive(Clone)]
pub struct MosConfig {
    /// Server base URL without trailing slash (e.g. "https://storage.example.com").
    pub base_url: String,

    /// Project id.
    pub project_id: String,

    /// Bucket name.
    pub bucket: String,

    /// Signing credentials.
    pub credentials: MosCredentials,

    /// Lifetime of presigned URLs when none is given.
    pub default_expires_in: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Read timeout for individual requests.
    pub read_timeout: Duration,

    /// Maximum idle connections kept per host.
    pub max_idle_connections: usize,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Verify TLS certificates.
    pub verify_tls: bool,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl std::fmt::Debug for MosConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MosConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("bucket", &self.bucket)
            .field("access_key", &self.credentials.access_key())
            .field("default_expires_in", &self.default_expires_in)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("verify_tls", &self.verify_tls)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl MosConfig {
    /// Create a new configuration builder.
    pub fn builder() -> MosConfigBuilder {
        MosConfigBuilder::default()
    }

    /// Build a configuration entirely from environment variables.
    pub fn from_env() -> Result<Self, MosError> {
        MosConfigBuilder::new().from_env().build()
    }

    /// Path of an object in the configured bucket, or of the bucket's object
    /// collection when `filename` is `None`.
    pub fn object_path(&self, filename: Option<&str>) -> String {
        paths::object_path(&self.project_id, &self.bucket, filename)
    }

    /// Unauthenticated URL of an object in the configured bucket.
    pub fn public_object_url(&self, filename: &str) -> String {
        paths::public_object_url(&self.base_url, &self.project_id, &self.bucket, filename)
    }
}

/// Builder for storage client configuration.
#[derive(Default)]
pub struct MosConfigBuilder {
    base_url: Option<String>,
    project_id: Option<String>,
    bucket: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    default_expires_in: Option<Duration>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_idle_connections: Option<usize>,
    idle_timeout: Option<Duration>,
    verify_tls: Option<bool>,
    user_agent: Option<String>,
    env_error: Option<ConfigurationError>,
}

impl MosConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the project id.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the bucket name.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the access key and secret key.
    pub fn credentials(mut self, access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Use already-loaded credentials.
    pub fn with_credentials(self, credentials: &MosCredentials) -> Self {
        self.credentials(credentials.access_key(), credentials.secret_key())
    }

    /// Set the default presigned URL lifetime.
    pub fn default_expires_in(mut self, expires_in: Duration) -> Self {
        self.default_expires_in = Some(expires_in);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    pub fn max_idle_connections(mut self, connections: usize) -> Self {
        self.max_idle_connections = Some(connections);
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Values already set on the builder are overwritten by set variables.
    /// An unparsable numeric override is reported by [`build`](Self::build).
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var(STORAGE_BASE_URL) {
            self.base_url = Some(val);
        }
        if let Ok(val) = std::env::var(STORAGE_PROJECT_ID) {
            self.project_id = Some(val);
        }
        if let Ok(val) = std::env::var(STORAGE_BUCKET) {
            self.bucket = Some(val);
        }
        if let Ok(val) = std::env::var(STORAGE_ACCESS_KEY) {
            self.access_key = Some(val);
        }
        if let Ok(val) = std::env::var(STORAGE_SECRET_KEY) {
            self.secret_key = Some(val);
        }

        if let Ok(val) = std::env::var(MOS_DEFAULT_EXPIRES_SECS) {
            match parse_override(MOS_DEFAULT_EXPIRES_SECS, &val) {
                Ok(secs) => self.default_expires_in = Some(Duration::from_secs(secs)),
                Err(e) => {
                    self.env_error.get_or_insert(e);
                }
            }
        }
        if let Ok(val) = std::env::var(MOS_TIMEOUT_MS) {
            match parse_override(MOS_TIMEOUT_MS, &val) {
                Ok(ms) => self.read_timeout = Some(Duration::from_millis(ms)),
                Err(e) => {
                    self.env_error.get_or_insert(e);
                }
            }
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<MosConfig, MosError> {
        if let Some(e) = self.env_error {
            return Err(e.into());
        }

        let base_url = validate_base_url(required(self.base_url, STORAGE_BASE_URL)?)?;
        let project_id = required(self.project_id, STORAGE_PROJECT_ID)?;
        let bucket = required(self.bucket, STORAGE_BUCKET)?;

        for (field, value) in [("project_id", &project_id), ("bucket", &bucket)] {
            if value.contains('/') {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: field.to_string(),
                    message: "must not contain '/'".to_string(),
                }
                .into());
            }
        }

        let credentials = match (self.access_key, self.secret_key) {
            (Some(access_key), Some(secret_key)) => MosCredentials::new(access_key, secret_key),
            (None, _) => {
                return Err(CredentialsError::NotFound {
                    variable: STORAGE_ACCESS_KEY.to_string(),
                }
                .into())
            }
            (Some(_), None) => {
                return Err(CredentialsError::NotFound {
                    variable: STORAGE_SECRET_KEY.to_string(),
                }
                .into())
            }
        };
        credentials.validate()?;

        let default_expires_in = self.default_expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        if default_expires_in.as_secs() == 0 {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "default_expires_in".to_string(),
                message: "must be at least one second".to_string(),
            }
            .into());
        }

        Ok(MosConfig {
            base_url,
            project_id,
            bucket,
            credentials,
            default_expires_in,
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            read_timeout: self.read_timeout.unwrap_or(Duration::from_secs(60)),
            max_idle_connections: self.max_idle_connections.unwrap_or(32),
            idle_timeout: self.idle_timeout.unwrap_or(Duration::from_secs(90)),
            verify_tls: self.verify_tls.unwrap_or(true),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

fn required(value: Option<String>, variable: &str) -> Result<String, MosError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigurationError::Missing {
            field: variable.to_string(),
        }
        .into()),
    }
}

fn parse_override(variable: &str, raw: &str) -> Result<u64, ConfigurationError> {
    raw.trim()
        .parse()
        .map_err(|e| ConfigurationError::InvalidConfiguration {
            field: variable.to_string(),
            message: format!("'{}' is not a whole number: {}", raw, e),
        })
}

fn validate_base_url(raw: String) -> Result<String, MosError> {
    let url = Url::parse(&raw).map_err(|e| ConfigurationError::InvalidBaseUrl {
        url: raw.clone(),
        details: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: raw,
            details: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: raw,
            details: "must not carry a query or fragment".to_string(),
        }
        .into());
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn default_user_agent() -> String {
    format!("mos-storage-integration/{}", env!("CARGO_PKG_VERSION"))
}
