//! Storage client implementation.
//!
//! This module provides the main client interface and builder.

use crate::config::MosConfig;
use crate::error::{ConfigurationError, MosError};
use crate::services::{ObjectsService, PresignService};
use crate::signing::{Clock, MosSigner, UrlSigner};
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Storage client trait.
pub trait StorageClient: Send + Sync {
    /// Get the objects service.
    fn objects(&self) -> &ObjectsService;

    /// Get the presign service.
    fn presign(&self) -> &PresignService;

    /// Get the signer.
    fn signer(&self) -> Arc<dyn UrlSigner>;

    /// Get the client configuration.
    fn config(&self) -> &MosConfig;
}

/// Storage client implementation.
pub struct MosClientImpl {
    config: Arc<MosConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<MosSigner>,

    objects: OnceCell<ObjectsService>,
    presign: OnceCell<PresignService>,
}

impl MosClientImpl {
    /// Create a new client with the given configuration.
    pub fn new(config: MosConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = MosSigner::new(&config.base_url, config.credentials.clone());
        Self::with_signer(config, transport, signer)
    }

    fn with_signer(config: MosConfig, transport: Arc<dyn HttpTransport>, signer: MosSigner) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            signer: Arc::new(signer),
            objects: OnceCell::new(),
            presign: OnceCell::new(),
        }
    }
}

impl StorageClient for MosClientImpl {
    fn objects(&self) -> &ObjectsService {
        self.objects.get_or_init(|| {
            ObjectsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer.clone(),
            )
        })
    }

    fn presign(&self) -> &PresignService {
        self.presign
            .get_or_init(|| PresignService::new(self.config.clone(), self.signer.clone()))
    }

    fn signer(&self) -> Arc<dyn UrlSigner> {
        self.signer.clone()
    }

    fn config(&self) -> &MosConfig {
        &self.config
    }
}

impl std::fmt::Debug for MosClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MosClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the storage client.
#[derive(Default)]
pub struct MosClientBuilder {
    config: Option<MosConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl MosClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: MosConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom clock for expiry calculation.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MosClientImpl, MosError> {
        let config = match (self.config, self.from_env) {
            (Some(config), _) => config,
            (None, true) => MosConfig::from_env()?,
            (None, false) => {
                return Err(ConfigurationError::Missing {
                    field: "config".to_string(),
                }
                .into())
            }
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config)?),
        };

        let mut signer = MosSigner::new(&config.base_url, config.credentials.clone());
        if let Some(clock) = self.clock {
            signer = signer.with_clock(clock);
        }

        Ok(MosClientImpl::with_signer(config, transport, signer))
    }
}
