//! Error types for the object storage client.
//!
//! Errors are grouped by where they originate: local validation (configuration,
//! signing arguments, request building), the storage server (access, object and
//! server errors), and the transport in between. Every error derived from an
//! HTTP response keeps the status code and the raw body so callers can see
//! exactly what the server said.

mod mapping;

pub use mapping::{map_error_response, ApiErrorBody, ErrorResponse};

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the storage client.
#[derive(Debug, Error)]
pub enum MosError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Presigning errors.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Request validation errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Authentication and authorization errors reported by the server.
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Object operation errors reported by the server.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Server-side errors.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Response handling errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Local file transfer errors.
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl MosError {
    /// Returns true if the error is worth retrying.
    ///
    /// Server errors (5xx) and transient network failures are retryable;
    /// everything the client caused (4xx, bad arguments) is terminal. The
    /// client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            MosError::Network(e) => e.is_retryable(),
            MosError::Server(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns the retry delay hint if the server sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MosError::Server(ServerError::ServiceUnavailable { retry_after, .. }) => *retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status code if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Returns the server error code if one was present in the body.
    pub fn error_code(&self) -> Option<&str> {
        self.response().and_then(|r| r.code.as_deref())
    }

    /// Returns the raw response body if the error came from a response.
    pub fn response_body(&self) -> Option<&str> {
        self.response().map(|r| r.body.as_str())
    }

    fn response(&self) -> Option<&ErrorResponse> {
        match self {
            MosError::Access(e) => Some(e.response()),
            MosError::Object(e) => Some(e.response()),
            MosError::Server(e) => Some(e.response()),
            MosError::Response(ResponseError::UnexpectedStatus { response, .. })
            | MosError::Response(ResponseError::InvalidResponse { response, .. }) => Some(response),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing required setting.
    #[error("Missing configuration: {field} must be specified via config or environment")]
    Missing {
        /// The missing field.
        field: String,
    },

    /// Invalid base URL.
    #[error("Invalid base URL '{url}': {details}")]
    InvalidBaseUrl {
        /// The invalid URL.
        url: String,
        /// Details about the validation error.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials could be found.
    #[error("Credentials not found: {variable} is not set")]
    NotFound {
        /// The environment variable that was looked up.
        variable: String,
    },

    /// Credentials are present but unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },
}

/// Errors raised while computing a signature or presigned URL.
#[derive(Debug, Error)]
pub enum SigningError {
    /// A signing input is malformed.
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// The offending argument.
        argument: &'static str,
        /// Why it was rejected.
        message: String,
    },

    /// Signature calculation failed.
    #[error("Signature calculation failed: {message}")]
    CalculationFailed {
        /// Details about the calculation error.
        message: String,
    },
}

/// Request validation errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid filename.
    #[error("Invalid filename '{filename}': {reason}")]
    InvalidFilename {
        /// The invalid filename.
        filename: String,
        /// Reason why the name is invalid.
        reason: String,
    },

    /// Metadata could not be serialized.
    #[error("Invalid metadata: {message}")]
    InvalidMetadata {
        /// Serializer message.
        message: String,
    },
}

/// Authentication and authorization failures.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The access key is not known to the server.
    #[error("Invalid access key (HTTP {})", .response.status)]
    InvalidAccessKey {
        /// The server response.
        response: ErrorResponse,
    },

    /// The presigned URL is past its expiry time.
    #[error("Signature expired (HTTP {})", .response.status)]
    ExpiredSignature {
        /// The server response.
        response: ErrorResponse,
    },

    /// The signature does not match the request.
    #[error("Invalid signature (HTTP {})", .response.status)]
    InvalidSignature {
        /// The server response.
        response: ErrorResponse,
    },

    /// The key lacks the permission required by the method.
    #[error("Permission denied (HTTP {})", .response.status)]
    PermissionDenied {
        /// The server response.
        response: ErrorResponse,
    },

    /// Any other 401/403 rejection.
    #[error("Access denied (HTTP {}): {}", .response.status, .response.body)]
    AccessDenied {
        /// The server response.
        response: ErrorResponse,
    },
}

impl AccessError {
    /// Returns the canonical error code of this variant.
    pub fn code(&self) -> &str {
        match self {
            AccessError::InvalidAccessKey { .. } => "INVALID_ACCESS_KEY",
            AccessError::ExpiredSignature { .. } => "EXPIRED_SIGNATURE",
            AccessError::InvalidSignature { .. } => "INVALID_SIGNATURE",
            AccessError::PermissionDenied { .. } => "PERMISSION_DENIED",
            AccessError::AccessDenied { .. } => "ACCESS_DENIED",
        }
    }

    /// Returns the server response.
    pub fn response(&self) -> &ErrorResponse {
        match self {
            AccessError::InvalidAccessKey { response }
            | AccessError::ExpiredSignature { response }
            | AccessError::InvalidSignature { response }
            | AccessError::PermissionDenied { response }
            | AccessError::AccessDenied { response } => response,
        }
    }
}

/// Object operation errors.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Object (or its bucket/project) not found.
    #[error("Object not found: '{filename}'")]
    NotFound {
        /// The filename that was requested.
        filename: String,
        /// The server response.
        response: ErrorResponse,
    },

    /// Object rejected as too large.
    #[error("Object too large (HTTP {})", .response.status)]
    TooLarge {
        /// The server response.
        response: ErrorResponse,
    },
}

impl ObjectError {
    /// Returns the server response.
    pub fn response(&self) -> &ErrorResponse {
        match self {
            ObjectError::NotFound { response, .. } | ObjectError::TooLarge { response } => response,
        }
    }
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout duration.
        duration: Duration,
    },

    /// The request could not be built by the HTTP client.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    TlsError {
        /// Error message.
        message: String,
    },
}

impl NetworkError {
    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NetworkError::ConnectionFailed { .. } | NetworkError::Timeout { .. }
        )
    }
}

/// Server-side errors (5xx).
#[derive(Debug, Error)]
pub enum ServerError {
    /// Internal server error or any other 5xx.
    #[error("Internal server error (HTTP {}): {}", .response.status, .response.body)]
    InternalError {
        /// The server response.
        response: ErrorResponse,
    },

    /// Service unavailable (503).
    #[error("Service unavailable")]
    ServiceUnavailable {
        /// Retry after duration hint.
        retry_after: Option<Duration>,
        /// The server response.
        response: ErrorResponse,
    },

    /// Bad gateway (502).
    #[error("Bad gateway")]
    BadGateway {
        /// The server response.
        response: ErrorResponse,
    },
}

impl ServerError {
    /// Returns the server response.
    pub fn response(&self) -> &ErrorResponse {
        match self {
            ServerError::InternalError { response }
            | ServerError::ServiceUnavailable { response, .. }
            | ServerError::BadGateway { response } => response,
        }
    }

    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Response handling errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The response body could not be decoded.
    #[error("Invalid response (HTTP {}): {message}", .response.status)]
    InvalidResponse {
        /// Error message.
        message: String,
        /// The response as received.
        response: ErrorResponse,
    },

    /// The server answered with a status the operation does not expect.
    #[error("{operation} failed with status {}: {}", .response.status, .response.body)]
    UnexpectedStatus {
        /// The operation that was attempted.
        operation: &'static str,
        /// The server response.
        response: ErrorResponse,
    },
}

/// Local file I/O errors around uploads and downloads.
#[derive(Debug, Error)]
pub enum TransferError {
    /// A local file could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        /// The local path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A local file could not be written.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        /// The local path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
