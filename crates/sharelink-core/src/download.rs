//! Download orchestration
//!
//! One instance backs one download page. It loads file info once, then turns
//! a user's download action into a one-time transfer target. The server stays
//! authoritative for link status and the remaining-downloads count: the
//! client never decrements on its own.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::api::ShareApi;
use crate::error::log_error;
use crate::models::{FileInfoResponse, LinkStatus};
use crate::validation::validate_file_id;

pub const INVALID_FILE_ID_MESSAGE: &str = "Invalid file ID";
pub const INFO_FETCH_FAILED_MESSAGE: &str = "Unable to fetch file info";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again.";
pub const LINK_UNAVAILABLE_MESSAGE: &str = "Link unavailable.";

/// Download page phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPhase {
    Loading,
    /// Link is usable; a download may be triggered
    Ready,
    /// Server reported a terminal status
    Unavailable(LinkStatus),
    Error,
}

/// Outcome of [`DownloadOrchestrator::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Torn down before the response arrived; state untouched
    Cancelled,
    /// Nothing to load (invalid id, or already loaded)
    Skipped,
}

/// Outcome of [`DownloadOrchestrator::download`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Follow this transfer target to receive the file
    Navigate(String),
    /// State changed without a transfer target
    Updated,
    /// Download is not available in the current phase
    Ignored,
}

/// What the download page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPanel {
    Loading,
    Available {
        filename: Option<String>,
        remaining_label: Option<String>,
    },
    Unavailable {
        filename: Option<String>,
        text: String,
    },
}

/// View state of a download page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadState {
    pub file_id: Option<String>,
    pub phase: DownloadPhase,
    pub filename: Option<String>,
    pub message: Option<String>,
    pub remaining_downloads: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DownloadState {
    /// Link status as last reported, `None` while loading.
    pub fn status(&self) -> Option<LinkStatus> {
        match &self.phase {
            DownloadPhase::Loading => None,
            DownloadPhase::Ready => Some(LinkStatus::Ok),
            DownloadPhase::Unavailable(status) => Some(status.clone()),
            DownloadPhase::Error => Some(LinkStatus::Error),
        }
    }

    pub fn panel(&self) -> DownloadPanel {
        match &self.phase {
            DownloadPhase::Loading => DownloadPanel::Loading,
            DownloadPhase::Ready => DownloadPanel::Available {
                filename: self.filename.clone(),
                remaining_label: self
                    .remaining_downloads
                    .map(|n| format!("Remaining downloads: {}", n)),
            },
            DownloadPhase::Unavailable(_) | DownloadPhase::Error => DownloadPanel::Unavailable {
                filename: self.filename.clone(),
                text: self
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| LINK_UNAVAILABLE_MESSAGE.to_string()),
            },
        }
    }
}

/// State machine for a single download page.
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    state: DownloadState,
}

impl DownloadOrchestrator {
    /// Create the page state for a file id taken from the URL.
    ///
    /// A missing or malformed id puts the page straight into `Error`; no
    /// request will be made.
    pub fn new(file_id: Option<&str>) -> Self {
        let valid_id = file_id.and_then(|id| validate_file_id(id).ok().map(str::to_string));

        let state = match valid_id {
            Some(id) => DownloadState {
                file_id: Some(id),
                phase: DownloadPhase::Loading,
                filename: None,
                message: None,
                remaining_downloads: None,
                expires_at: None,
            },
            None => {
                tracing::debug!(file_id = ?file_id, "Rejecting download page for invalid file id");
                DownloadState {
                    file_id: None,
                    phase: DownloadPhase::Error,
                    filename: None,
                    message: Some(INVALID_FILE_ID_MESSAGE.to_string()),
                    remaining_downloads: None,
                    expires_at: None,
                }
            }
        };

        Self { state }
    }

    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    pub fn panel(&self) -> DownloadPanel {
        self.state.panel()
    }

    /// Fetch file info.
    ///
    /// The token stands for the page's lifetime. Once it is cancelled the
    /// pending request is dropped and no state is written, even if the
    /// response has already arrived.
    pub async fn load(&mut self, api: &dyn ShareApi, cancel: &CancellationToken) -> LoadOutcome {
        if self.state.phase != DownloadPhase::Loading {
            return LoadOutcome::Skipped;
        }
        let Some(file_id) = self.state.file_id.clone() else {
            return LoadOutcome::Skipped;
        };
        if cancel.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        tracing::debug!(file_id = %file_id, "Fetching file info");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = api.file_info(&file_id) => Some(result),
        };

        let result = match result {
            Some(result) if !cancel.is_cancelled() => result,
            _ => {
                tracing::debug!(file_id = %file_id, "File info request cancelled");
                return LoadOutcome::Cancelled;
            }
        };

        match result {
            Ok(info) => self.apply_info(info),
            Err(err) => {
                log_error(&err, &format!("Failed to fetch file info for {}", file_id));
                self.state.phase = DownloadPhase::Error;
                self.state.filename = None;
                self.state.message = Some(INFO_FETCH_FAILED_MESSAGE.to_string());
                self.state.remaining_downloads = None;
                self.state.expires_at = None;
            }
        }

        LoadOutcome::Applied
    }

    fn apply_info(&mut self, info: FileInfoResponse) {
        tracing::debug!(status = %info.status, "File info received");
        self.state.remaining_downloads = info.remaining();
        self.state.expires_at = info.expires_at();
        self.state.phase = if info.status.is_ok() {
            DownloadPhase::Ready
        } else {
            DownloadPhase::Unavailable(info.status)
        };
        self.state.filename = info.filename;
        self.state.message = info.message;
    }

    /// Request a transfer target for the user's download action.
    ///
    /// Only valid while `Ready`. Returns [`DownloadOutcome::Navigate`] exactly
    /// when the server handed out a URL.
    pub async fn download(&mut self, api: &dyn ShareApi) -> DownloadOutcome {
        if self.state.phase != DownloadPhase::Ready {
            return DownloadOutcome::Ignored;
        }
        let Some(file_id) = self.state.file_id.clone() else {
            return DownloadOutcome::Ignored;
        };

        tracing::info!(file_id = %file_id, "Requesting download");
        let response = match api.download(&file_id).await {
            Ok(response) => response,
            Err(err) => {
                log_error(&err, &format!("Download request failed for {}", file_id));
                self.state.phase = DownloadPhase::Error;
                self.state.message = Some(DOWNLOAD_FAILED_MESSAGE.to_string());
                return DownloadOutcome::Updated;
            }
        };

        let remaining = response.remaining();
        match (response.status, response.download_url) {
            (LinkStatus::Ok, Some(url)) => {
                if remaining.is_some() {
                    self.state.remaining_downloads = remaining;
                }
                tracing::info!(
                    file_id = %file_id,
                    remaining_downloads = ?self.state.remaining_downloads,
                    "Download granted"
                );
                DownloadOutcome::Navigate(url)
            }
            (LinkStatus::Ok, None) => {
                tracing::warn!(file_id = %file_id, "Download granted without a transfer target");
                self.state.phase = DownloadPhase::Error;
                self.state.message = Some(DOWNLOAD_FAILED_MESSAGE.to_string());
                DownloadOutcome::Updated
            }
            (status, _) => {
                tracing::info!(file_id = %file_id, status = %status, "Link no longer available");
                self.state.phase = DownloadPhase::Unavailable(status);
                self.state.message = response.message;
                self.state.remaining_downloads = remaining;
                DownloadOutcome::Updated
            }
        }
    }
}
