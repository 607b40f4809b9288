//! Sharelink Core Library
//!
//! This crate provides the client-side domain for sharelink: configuration, error
//! types, local file validation, API wire models, and the upload/download
//! orchestrators that sequence calls against a [`ShareApi`] implementation.

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod upload;
pub mod validation;

// Re-export commonly used types
pub use api::ShareApi;
pub use config::ClientConfig;
pub use download::{
    DownloadOrchestrator, DownloadOutcome, DownloadPanel, DownloadPhase, DownloadState, LoadOutcome,
};
pub use error::{log_error, ErrorMetadata, LogLevel, ShareError, ShareResult};
pub use models::{
    DownloadResponse, ExpiryHours, FileInfoResponse, HealthResponse, LinkStatus, MaxDownloads,
    UploadInitRequest, UploadInitResponse,
};
pub use upload::{SelectedFile, UploadOrchestrator, UploadPhase};
pub use validation::{validate_file, validate_file_id, FileRejection, MAX_FILE_SIZE_BYTES};
