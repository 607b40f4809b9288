//! Upload orchestration
//!
//! Drives one upload form: file selection with local validation, then on
//! explicit submission the two-step sequence
//!
//! 1. request an upload target and share link (`POST /upload`)
//! 2. PUT the file bytes to the returned target
//!
//! The share link is published only after both steps succeed. Failures land in
//! [`UploadPhase::Failed`]; recovery is always a new submission by the user.

use bytes::Bytes;
use validator::Validate;

use crate::api::ShareApi;
use crate::error::{log_error, ErrorMetadata, ShareError};
use crate::models::{ExpiryHours, MaxDownloads, UploadInitRequest};
use crate::validation::validate_file;

pub const TRANSFER_FAILED_MESSAGE: &str =
    "Upload failed: the file could not be transferred to storage";
pub const UPLOAD_INTERRUPTED_MESSAGE: &str = "Upload interrupted";

/// A locally selected file.
///
/// `size_bytes` is the declared size used for validation. It normally equals
/// `data.len()`, but callers may skip loading oversized files and declare the
/// size alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            mime_type: mime_type.into(),
            data,
        }
    }

    /// A file known only by its declared size, with no loaded content.
    pub fn declared(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            data: Bytes::new(),
        }
    }
}

/// Upload flow phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadPhase {
    /// No file selected
    #[default]
    Idle,
    /// A file passed local validation and waits for submission
    Validating,
    /// Waiting for the upload target
    RequestingTarget,
    /// Sending the bytes to the upload target
    Transferring,
    Done {
        share_url: String,
    },
    Failed {
        message: String,
    },
}

impl UploadPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, UploadPhase::RequestingTarget | UploadPhase::Transferring)
    }

    pub fn share_url(&self) -> Option<&str> {
        match self {
            UploadPhase::Done { share_url } => Some(share_url),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadPhase::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Holds the phase while a submission is in flight.
///
/// If the submission future is dropped before [`InFlight::finish`], the
/// phase moves to `Failed` instead of staying in flight.
struct InFlight<'a> {
    phase: &'a mut UploadPhase,
}

impl<'a> InFlight<'a> {
    fn start(phase: &'a mut UploadPhase) -> Self {
        *phase = UploadPhase::RequestingTarget;
        Self { phase }
    }

    fn advance(&mut self, next: UploadPhase) {
        *self.phase = next;
    }

    fn finish(self, outcome: UploadPhase) {
        *self.phase = outcome;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.phase.is_in_flight() {
            tracing::warn!(phase = ?self.phase, "Upload dropped before completion");
            *self.phase = UploadPhase::Failed {
                message: UPLOAD_INTERRUPTED_MESSAGE.to_string(),
            };
        }
    }
}

/// State machine for a single upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOrchestrator {
    file: Option<SelectedFile>,
    max_downloads: u8,
    expiry: ExpiryHours,
    phase: UploadPhase,
}

impl Default for UploadOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadOrchestrator {
    pub fn new() -> Self {
        Self {
            file: None,
            max_downloads: MaxDownloads::default().get(),
            expiry: ExpiryHours::default(),
            phase: UploadPhase::Idle,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn max_downloads(&self) -> u8 {
        self.max_downloads
    }

    pub fn expiry(&self) -> ExpiryHours {
        self.expiry
    }

    pub fn set_max_downloads(&mut self, value: u8) {
        self.max_downloads = value;
    }

    pub fn set_expiry(&mut self, expiry: ExpiryHours) {
        self.expiry = expiry;
    }

    /// Whether a submission would start an upload right now.
    pub fn can_submit(&self) -> bool {
        !self.phase.is_in_flight()
            && self.file.is_some()
            && MaxDownloads::new(self.max_downloads).is_some()
    }

    /// Select a file, from a picker or a drop.
    ///
    /// An accepted file replaces the current selection. A rejected file moves
    /// the flow to `Failed` with the rejection message and keeps whatever
    /// file was selected before.
    pub fn select_file(&mut self, file: SelectedFile) -> &UploadPhase {
        if self.phase.is_in_flight() {
            tracing::debug!(filename = %file.name, "Ignoring file selection during upload");
            return &self.phase;
        }

        match validate_file(file.size_bytes, &file.mime_type) {
            Ok(()) => {
                tracing::debug!(
                    filename = %file.name,
                    size_bytes = file.size_bytes,
                    mime_type = %file.mime_type,
                    "File accepted"
                );
                self.file = Some(file);
                self.phase = UploadPhase::Validating;
            }
            Err(rejection) => {
                tracing::debug!(
                    filename = %file.name,
                    size_bytes = file.size_bytes,
                    mime_type = %file.mime_type,
                    reason = ?rejection,
                    "File rejected"
                );
                self.phase = UploadPhase::Failed {
                    message: rejection.to_string(),
                };
            }
        }

        &self.phase
    }

    /// Drop the current selection and return to `Idle`.
    pub fn remove_file(&mut self) {
        if self.phase.is_in_flight() {
            return;
        }
        self.file = None;
        self.phase = UploadPhase::Idle;
    }

    /// Submit the selected file.
    ///
    /// A no-op unless a file is selected, the max-downloads value is in range,
    /// and no upload is already in flight.
    pub async fn submit(&mut self, api: &dyn ShareApi) -> &UploadPhase {
        if self.phase.is_in_flight() {
            return &self.phase;
        }
        let Some(max_downloads) = MaxDownloads::new(self.max_downloads) else {
            return &self.phase;
        };
        let Some(file) = self.file.as_ref() else {
            return &self.phase;
        };

        // The selection may predate a rejected pick; check it again.
        if let Err(rejection) = validate_file(file.size_bytes, &file.mime_type) {
            self.phase = UploadPhase::Failed {
                message: rejection.to_string(),
            };
            return &self.phase;
        }

        let request = UploadInitRequest::new(file.name.clone(), max_downloads, self.expiry);
        if let Err(errors) = request.validate() {
            let err = ShareError::from(errors);
            self.phase = UploadPhase::Failed {
                message: format!("Upload failed: {}", err.client_message()),
            };
            return &self.phase;
        }

        let content_type = file.mime_type.clone();
        let data = file.data.clone();

        tracing::info!(
            filename = %request.filename,
            size_bytes = data.len(),
            max_downloads = request.max_downloads,
            expires_in_hours = request.expires_in_hours,
            "Requesting upload target"
        );
        let mut flight = InFlight::start(&mut self.phase);

        let target = match api.request_upload_target(&request).await {
            Ok(target) => target,
            Err(err) => {
                log_error(&err, "Upload target request failed");
                flight.finish(UploadPhase::Failed {
                    message: format!("Upload failed: {}", err.client_message()),
                });
                return &self.phase;
            }
        };

        flight.advance(UploadPhase::Transferring);

        if let Err(err) = api
            .transfer_file(&target.upload_url, &content_type, data)
            .await
        {
            // Storage backend detail stays in the logs.
            tracing::debug!(error = %err, "Transfer to upload target failed");
            tracing::warn!(error_code = err.error_code(), "File transfer failed");
            flight.finish(UploadPhase::Failed {
                message: TRANSFER_FAILED_MESSAGE.to_string(),
            });
            return &self.phase;
        }

        tracing::info!(share_url = %target.download_page_url, "Upload complete");
        self.file = None;
        flight.finish(UploadPhase::Done {
            share_url: target.download_page_url,
        });
        &self.phase
    }
}
