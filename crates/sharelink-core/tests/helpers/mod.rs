//! Test helpers: a scripted in-memory `ShareApi`.
//!
//! Run from workspace root: `cargo test -p sharelink-core`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use sharelink_core::{
    DownloadResponse, FileInfoResponse, LinkStatus, ShareApi, ShareError, ShareResult,
    UploadInitRequest, UploadInitResponse,
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Canned reply for one fake endpoint.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Reply(T),
    /// Non-2xx answer with status and body
    Status(u16, String),
    /// Connection-level failure
    Transport,
    /// Never answers
    Hang,
}

impl<T: Clone> Scripted<T> {
    async fn result(&self) -> ShareResult<T> {
        match self {
            Scripted::Hang => std::future::pending().await,
            Scripted::Reply(value) => Ok(value.clone()),
            Scripted::Status(status, body) => Err(ShareError::Api {
                status: *status,
                body: body.clone(),
            }),
            Scripted::Transport => Err(ShareError::Transport(
                "connection reset by peer".to_string(),
            )),
        }
    }
}

/// A call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadTarget(UploadInitRequest),
    Transfer {
        url: String,
        content_type: String,
        len: usize,
    },
    FileInfo(String),
    Download(String),
}

pub struct FakeApi {
    upload_target: Scripted<UploadInitResponse>,
    transfer: Scripted<()>,
    file_info: Scripted<FileInfoResponse>,
    download: Scripted<DownloadResponse>,
    info_gate: Option<Arc<Notify>>,
    cancel_during_info: Option<CancellationToken>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            upload_target: Scripted::Transport,
            transfer: Scripted::Transport,
            file_info: Scripted::Transport,
            download: Scripted::Transport,
            info_gate: None,
            cancel_during_info: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload_target(mut self, reply: Scripted<UploadInitResponse>) -> Self {
        self.upload_target = reply;
        self
    }

    pub fn with_transfer(mut self, reply: Scripted<()>) -> Self {
        self.transfer = reply;
        self
    }

    pub fn with_file_info(mut self, reply: Scripted<FileInfoResponse>) -> Self {
        self.file_info = reply;
        self
    }

    pub fn with_download(mut self, reply: Scripted<DownloadResponse>) -> Self {
        self.download = reply;
        self
    }

    /// Hold `file_info` until the gate is notified.
    pub fn with_info_gate(mut self, gate: Arc<Notify>) -> Self {
        self.info_gate = Some(gate);
        self
    }

    /// Cancel `token` while the info response is on its way back.
    pub fn cancelling_during_info(mut self, token: CancellationToken) -> Self {
        self.cancel_during_info = Some(token);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ShareApi for FakeApi {
    async fn request_upload_target(
        &self,
        request: &UploadInitRequest,
    ) -> ShareResult<UploadInitResponse> {
        self.record(Call::UploadTarget(request.clone()));
        self.upload_target.result().await
    }

    async fn transfer_file(
        &self,
        upload_url: &str,
        content_type: &str,
        data: Bytes,
    ) -> ShareResult<()> {
        self.record(Call::Transfer {
            url: upload_url.to_string(),
            content_type: content_type.to_string(),
            len: data.len(),
        });
        self.transfer.result().await
    }

    async fn file_info(&self, file_id: &str) -> ShareResult<FileInfoResponse> {
        self.record(Call::FileInfo(file_id.to_string()));
        if let Some(gate) = &self.info_gate {
            gate.notified().await;
        }
        if let Some(token) = &self.cancel_during_info {
            token.cancel();
        }
        self.file_info.result().await
    }

    async fn download(&self, file_id: &str) -> ShareResult<DownloadResponse> {
        self.record(Call::Download(file_id.to_string()));
        self.download.result().await
    }
}

pub fn upload_target(upload_url: &str, page_url: &str) -> UploadInitResponse {
    UploadInitResponse {
        upload_url: upload_url.to_string(),
        download_page_url: page_url.to_string(),
        file_id: None,
        s3_key: None,
    }
}

pub fn info(
    status: &str,
    filename: Option<&str>,
    message: Option<&str>,
    remaining: Option<i64>,
) -> FileInfoResponse {
    FileInfoResponse {
        status: LinkStatus::from(status),
        filename: filename.map(str::to_string),
        message: message.map(str::to_string),
        remaining_downloads: remaining,
        expires_at_iso: None,
    }
}

pub fn download_reply(
    status: &str,
    download_url: Option<&str>,
    message: Option<&str>,
    remaining: Option<i64>,
) -> DownloadResponse {
    DownloadResponse {
        status: LinkStatus::from(status),
        download_url: download_url.map(str::to_string),
        message: message.map(str::to_string),
        remaining_downloads: remaining,
        filename: None,
        expires_at_iso: None,
    }
}
