//! HTTP transport layer for storage requests.
//!
//! This module provides the HTTP transport abstraction used by the object
//! operations. It handles connection pooling, timeouts, and TLS configuration.

mod multipart;

pub use multipart::MultipartForm;

use crate::config::MosConfig;
use crate::error::{MosError, NetworkError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a multipart body and its content type.
    pub fn with_multipart(self, form: MultipartForm) -> Self {
        let (content_type, body) = form.build();
        self.with_header("Content-Type", content_type).with_body(body)
    }
}

/// HTTP response received.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get the content length.
    pub fn content_length(&self) -> Option<u64> {
        self.get_header("content-length").and_then(|v| v.parse().ok())
    }

    /// Get the content type.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    /// Parse a `Retry-After` header given in seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.get_header("retry-after")
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_secs)
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// Any status code is a successful send; only transport failures are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MosError>;
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, MosError> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Create a transport tuned by the client configuration.
    pub fn from_config(config: &MosConfig) -> Result<Self, MosError> {
        Self::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .pool_max_idle_per_host(config.max_idle_connections)
            .pool_idle_timeout(Some(config.idle_timeout))
            .verify_tls(config.verify_tls)
            .user_agent(config.user_agent.clone())
            .build()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MosError> {
        let method = request.method.parse::<reqwest::Method>().map_err(|e| {
            MosError::Network(NetworkError::InvalidRequest {
                message: format!("Invalid HTTP method: {}", e),
            })
        })?;

        let mut req_builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl ReqwestTransport {
    fn map_reqwest_error(&self, e: reqwest::Error) -> MosError {
        if e.is_timeout() {
            MosError::Network(NetworkError::Timeout {
                duration: self.read_timeout,
            })
        } else if e.is_builder() {
            MosError::Network(NetworkError::InvalidRequest {
                message: e.to_string(),
            })
        } else {
            MosError::Network(NetworkError::ConnectionFailed {
                message: e.to_string(),
            })
        }
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    verify_tls: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            verify_tls: true,
            user_agent: format!("mos-storage-integration/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the idle connection timeout.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to verify TLS certificates.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, MosError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| {
                MosError::Network(NetworkError::TlsError {
                    message: e.to_string(),
                })
            })?;

        Ok(ReqwestTransport {
            client,
            read_timeout: self.read_timeout,
        })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new("DELETE", "https://example.com/x")
            .with_header("Accept", "application/json")
            .with_body(&b"body"[..]);

        assert_eq!(request.method, "DELETE");
        assert_eq!(request.url, "https://example.com/x");
        assert_eq!(
            request.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert!(request.body.is_some());
    }

    #[test]
    fn test_with_multipart_sets_content_type() {
        let request = HttpRequest::new("POST", "https://example.com")
            .with_multipart(MultipartForm::with_boundary("B").text("a", "b"));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("multipart/form-data; boundary=B")
        );
        assert!(request.body.unwrap().starts_with(b"--B\r\n"));
    }

    #[test]
    fn test_http_response_headers() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "image/jpeg".to_string());
        headers.insert("Content-Length".to_string(), "1024".to_string());
        headers.insert("Retry-After".to_string(), "30".to_string());

        let response = HttpResponse {
            status: 200,
            headers,
            body: Bytes::new(),
        };

        assert!(response.is_success());
        assert_eq!(response.get_header("content-type"), Some("image/jpeg"));
        assert_eq!(response.content_length(), Some(1024));
        assert_eq!(response.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_transport_builder() {
        let transport = ReqwestTransport::builder()
            .connect_timeout(Duration::from_secs(5))
            .read_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .verify_tls(true)
            .build();

        assert!(transport.is_ok());
    }
}
