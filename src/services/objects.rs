//! Objects service for upload, download and delete.
//!
//! Every operation presigns its own URL and issues one plain HTTP request
//! against it. Nothing is retried; a failed call returns the server's status
//! and body unchanged inside the error.

use super::{validate_filename, PresignService};
use crate::config::MosConfig;
use crate::error::{map_error_response, ErrorResponse, MosError, RequestError, ResponseError, TransferError};
use crate::signing::UrlSigner;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, MultipartForm};
use crate::types::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const UPLOAD_CREATED: u16 = 201;
const DOWNLOAD_OK: u16 = 200;
const DELETE_NO_CONTENT: u16 = 204;

/// Service for object operations.
pub struct ObjectsService {
    config: Arc<MosConfig>,
    transport: Arc<dyn HttpTransport>,
    presign: PresignService,
}

impl ObjectsService {
    /// Create a new objects service.
    pub fn new(
        config: Arc<MosConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn UrlSigner>,
    ) -> Self {
        Self {
            presign: PresignService::new(config.clone(), signer),
            config,
            transport,
        }
    }

    /// Upload an in-memory object.
    ///
    /// The server stores the object under a generated name, returned in
    /// [`FileResponse::name`]; use that name for later downloads and deletes.
    #[instrument(skip(self, request), fields(filename = %request.filename, size = request.body.len()))]
    pub async fn upload(&self, request: UploadRequest) -> Result<FileResponse, MosError> {
        validate_filename(&request.filename)?;

        let url = self.presign.upload_object_url(request.options.expires_in)?;
        let content_type = request.content_type().to_string();

        let mut form = MultipartForm::new().file("file", &request.filename, &content_type, request.body);
        if let Some(metadata) = &request.options.metadata {
            let json = serde_json::to_string(metadata).map_err(|e| RequestError::InvalidMetadata {
                message: e.to_string(),
            })?;
            form = form.text("metadata", json);
        }

        let http_request = HttpRequest::new(HttpMethod::Post.as_str(), url.into_string())
            .with_header("Accept", "application/json")
            .with_multipart(form);

        let response = self.transport.send(http_request).await?;
        if response.status != UPLOAD_CREATED {
            return Err(self.failure(response, "upload", None));
        }

        let file: FileResponse = serde_json::from_slice(&response.body).map_err(|e| {
            ResponseError::InvalidResponse {
                message: format!("Failed to parse upload response: {}", e),
                response: ErrorResponse::from_bytes(response.status, &response.body),
            }
        })?;

        debug!(stored_name = %file.name, size = file.size, "upload complete");
        Ok(file)
    }

    /// Upload a local file under its base name.
    #[instrument(skip(self, path, options), fields(path = %path.as_ref().display()))]
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<FileResponse, MosError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| RequestError::InvalidFilename {
                filename: path.display().to_string(),
                reason: "path has no UTF-8 file name".to_string(),
            })?
            .to_string();

        let body = tokio::fs::read(path)
            .await
            .map_err(|source| TransferError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;

        self.upload(UploadRequest::new(filename, body).with_options(options))
            .await
    }

    /// Download an object through a presigned GET URL.
    #[instrument(skip(self))]
    pub async fn download(
        &self,
        filename: &str,
        expires_in: Option<Duration>,
    ) -> Result<ObjectBody, MosError> {
        let url = self.presign.get_object_url(filename, expires_in)?;
        self.fetch(url.into_string(), filename).await
    }

    /// Download an object through the unauthenticated public endpoint.
    #[instrument(skip(self))]
    pub async fn download_public(&self, filename: &str) -> Result<ObjectBody, MosError> {
        let url = self.presign.public_object_url(filename)?;
        self.fetch(url, filename).await
    }

    /// Download an object through a presigned GET URL into a local file.
    ///
    /// The file is only created once the server answered successfully.
    #[instrument(skip(self, local_path), fields(local_path = %local_path.as_ref().display()))]
    pub async fn download_to_file(
        &self,
        filename: &str,
        local_path: impl AsRef<Path>,
        expires_in: Option<Duration>,
    ) -> Result<u64, MosError> {
        let object = self.download(filename, expires_in).await?;
        let local_path = local_path.as_ref();

        tokio::fs::write(local_path, &object.body)
            .await
            .map_err(|source| TransferError::WriteFailed {
                path: local_path.display().to_string(),
                source,
            })?;

        Ok(object.body.len() as u64)
    }

    /// Delete an object through a presigned DELETE URL.
    #[instrument(skip(self))]
    pub async fn delete(&self, filename: &str, expires_in: Option<Duration>) -> Result<(), MosError> {
        let url = self.presign.delete_object_url(filename, expires_in)?;

        let response = self
            .transport
            .send(HttpRequest::new(HttpMethod::Delete.as_str(), url.into_string()))
            .await?;

        if response.status != DELETE_NO_CONTENT {
            return Err(self.failure(response, "delete", Some(filename)));
        }
        Ok(())
    }

    async fn fetch(&self, url: String, filename: &str) -> Result<ObjectBody, MosError> {
        let response = self
            .transport
            .send(HttpRequest::new(HttpMethod::Get.as_str(), url))
            .await?;

        if response.status != DOWNLOAD_OK {
            return Err(self.failure(response, "download", Some(filename)));
        }

        Ok(ObjectBody {
            content_type: response.content_type().map(String::from),
            content_length: response.content_length(),
            body: response.body,
        })
    }

    fn failure(&self, response: HttpResponse, operation: &'static str, filename: Option<&str>) -> MosError {
        let retry_after = response.retry_after();
        let error_response = ErrorResponse::from_bytes(response.status, &response.body);

        warn!(
            operation,
            status = error_response.status,
            code = error_response.code.as_deref().unwrap_or(""),
            "request rejected"
        );

        map_error_response(error_response, operation, filename, retry_after)
    }
}

impl std::fmt::Debug for ObjectsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectsService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
