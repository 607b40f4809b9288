//! Domain methods for the sharing API client.
//!
//! Wire types come from `sharelink_core::models`; this module maps them onto
//! the HTTP endpoints and implements [`ShareApi`].

use async_trait::async_trait;
use bytes::Bytes;
use sharelink_core::models::HealthResponse;
use sharelink_core::{
    DownloadResponse, FileInfoResponse, ShareApi, ShareError, ShareResult, UploadInitRequest,
    UploadInitResponse,
};

use crate::ShareClient;

impl ShareClient {
    /// Request a presigned upload target and share link.
    pub async fn request_upload(
        &self,
        request: &UploadInitRequest,
    ) -> ShareResult<UploadInitResponse> {
        self.post_json("/upload", request).await
    }

    /// File metadata without consuming a download.
    pub async fn get_file_info(&self, file_id: &str) -> ShareResult<FileInfoResponse> {
        self.get("/file-info", &[("file_id", file_id)]).await
    }

    /// Consume one download and receive a transfer target.
    pub async fn request_download(&self, file_id: &str) -> ShareResult<DownloadResponse> {
        self.get("/download", &[("file_id", file_id)]).await
    }

    /// Check that the API is up.
    pub async fn health(&self) -> ShareResult<()> {
        let response: HealthResponse = self.get("/health", &[]).await?;
        if response.status == "ok" {
            Ok(())
        } else {
            Err(ShareError::InvalidResponse(format!(
                "Health check reported status {:?}",
                response.status
            )))
        }
    }
}

#[async_trait]
impl ShareApi for ShareClient {
    async fn request_upload_target(
        &self,
        request: &UploadInitRequest,
    ) -> ShareResult<UploadInitResponse> {
        self.request_upload(request).await
    }

    async fn transfer_file(
        &self,
        upload_url: &str,
        content_type: &str,
        data: Bytes,
    ) -> ShareResult<()> {
        self.put_bytes(upload_url, content_type, data).await
    }

    async fn file_info(&self, file_id: &str) -> ShareResult<FileInfoResponse> {
        self.get_file_info(file_id).await
    }

    async fn download(&self, file_id: &str) -> ShareResult<DownloadResponse> {
        self.request_download(file_id).await
    }
}
