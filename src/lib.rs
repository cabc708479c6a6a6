//! Miphira Object Storage Integration Module
//!
//! Client for Miphira Object Storage (MOS) built around HMAC-SHA256 presigned
//! URLs.
//!
//! # Features
//!
//! - **Presigned URLs**: time-limited GET/POST/DELETE URLs signed with the secret key
//! - **Public URLs**: unauthenticated object URLs for public buckets
//! - **Object Operations**: multipart upload, download, delete
//! - **Verification**: check presigned URLs the way the server does
//! - **Observability**: tracing spans on every network operation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mos_storage::{StorageClient, UploadRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mos_storage::MosError> {
//!     // Create client from environment
//!     let client = mos_storage::create_client_from_env()?;
//!
//!     // Share a download link valid for ten minutes
//!     let url = client
//!         .presign()
//!         .get_object_url("photo.jpg", Some(Duration::from_secs(600)))?;
//!     println!("{}", url);
//!
//!     // Upload an object
//!     let file = client
//!         .objects()
//!         .upload(UploadRequest::new("hello.txt", "Hello, MOS!"))
//!         .await?;
//!     println!("Stored as {}", file.name);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod paths;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::{MosClientBuilder, MosClientImpl, StorageClient};
pub use config::{MosConfig, MosConfigBuilder, DEFAULT_EXPIRES_IN};
pub use credentials::{EnvCredentialsLoader, MosCredentials};
pub use error::{
    AccessError, ConfigurationError, CredentialsError, ErrorResponse, MosError, NetworkError,
    ObjectError, RequestError, ResponseError, ServerError, SigningError, TransferError,
};
pub use paths::{object_path, public_object_url};
pub use services::{ObjectsService, PresignService};
pub use signing::{
    compute_signature, Clock, MosSigner, PresignedUrlVerifier, SystemClock, UrlSigner,
    VerifiedRequest,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    FileResponse, HttpMethod, Metadata, ObjectBody, Permission, PresignedUrl, UploadOptions,
    UploadRequest,
};

/// Create a new storage client from environment variables.
///
/// This reads:
/// - `STORAGE_BASE_URL`, `STORAGE_PROJECT_ID`, `STORAGE_BUCKET`
/// - `STORAGE_ACCESS_KEY` and `STORAGE_SECRET_KEY` for credentials
/// - `MOS_DEFAULT_EXPIRES_SECS` and `MOS_TIMEOUT_MS` as optional overrides
///
/// # Example
///
/// ```rust,no_run
/// let client = mos_storage::create_client_from_env()?;
/// # Ok::<(), mos_storage::MosError>(())
/// ```
pub fn create_client_from_env() -> Result<impl StorageClient> {
    MosClientBuilder::new().from_env().build()
}

/// Create a new storage client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use mos_storage::MosConfig;
///
/// let config = MosConfig::builder()
///     .base_url("https://storage.example.com")
///     .project_id("my-project")
///     .bucket("images")
///     .credentials("MOS_xxx", "secret")
///     .build()?;
///
/// let client = mos_storage::create_client(config)?;
/// # Ok::<(), mos_storage::MosError>(())
/// ```
pub fn create_client(config: MosConfig) -> Result<impl StorageClient> {
    MosClientBuilder::new().config(config).build()
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, MosError>;
