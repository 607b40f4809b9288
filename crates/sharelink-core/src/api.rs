//! Sharing API abstraction
//!
//! The orchestrators only talk to the backend through this trait. The HTTP
//! implementation lives in `sharelink-api-client`; tests provide scripted fakes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ShareResult;
use crate::models::{DownloadResponse, FileInfoResponse, UploadInitRequest, UploadInitResponse};

/// Operations the upload and download flows depend on.
#[async_trait]
pub trait ShareApi: Send + Sync {
    /// Request an upload target and a share-page URL (`POST /upload`).
    ///
    /// A non-2xx reply must be reported as `ShareError::Api` carrying the
    /// status and raw body.
    async fn request_upload_target(
        &self,
        request: &UploadInitRequest,
    ) -> ShareResult<UploadInitResponse>;

    /// PUT raw file bytes to a transfer target. Only success or failure matters.
    async fn transfer_file(&self, upload_url: &str, content_type: &str, data: Bytes)
        -> ShareResult<()>;

    /// Fetch descriptive metadata for a shared file (`GET /file-info`).
    async fn file_info(&self, file_id: &str) -> ShareResult<FileInfoResponse>;

    /// Request a one-time transfer target (`GET /download`). The server
    /// counts a download when it hands out the URL.
    async fn download(&self, file_id: &str) -> ShareResult<DownloadResponse>;
}
