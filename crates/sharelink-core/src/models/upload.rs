use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ExpiryHours, MaxDownloads};

/// Request body for `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UploadInitRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    /// Number of downloads before the link is exhausted
    #[validate(range(min = 1, max = 5, message = "Max downloads must be between 1 and 5"))]
    pub max_downloads: u8,
    /// Link lifetime in hours
    #[validate(range(min = 1, max = 72, message = "Expiry must be between 1 and 72 hours"))]
    pub expires_in_hours: u32,
}

impl UploadInitRequest {
    pub fn new(filename: impl Into<String>, max_downloads: MaxDownloads, expiry: ExpiryHours) -> Self {
        Self {
            filename: filename.into(),
            max_downloads: max_downloads.get(),
            expires_in_hours: expiry.hours(),
        }
    }
}

/// Response from `POST /upload`: where to PUT the bytes and the link to share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInitResponse {
    /// Presigned transfer target for the raw file bytes
    pub upload_url: String,
    /// User-facing share page embedding the file id
    pub download_page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Object key in storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}
