use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Link status reported by the API
///
/// Anything other than [`LinkStatus::Ok`] is terminal: the link can no longer
/// be used and the server message explains why. Unknown statuses are kept
/// verbatim in [`LinkStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    Ok,
    Expired,
    Maxed,
    NotFound,
    Error,
    Other(String),
}

impl LinkStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LinkStatus::Ok => "ok",
            LinkStatus::Expired => "expired",
            LinkStatus::Maxed => "maxed",
            LinkStatus::NotFound => "not_found",
            LinkStatus::Error => "error",
            LinkStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, LinkStatus::Ok)
    }
}

impl From<&str> for LinkStatus {
    fn from(s: &str) -> Self {
        match s {
            "ok" => LinkStatus::Ok,
            "expired" => LinkStatus::Expired,
            "maxed" => LinkStatus::Maxed,
            "not_found" => LinkStatus::NotFound,
            "error" => LinkStatus::Error,
            other => LinkStatus::Other(other.to_string()),
        }
    }
}

impl Display for LinkStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Serialize for LinkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LinkStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LinkStatus::from(s.as_str()))
    }
}

/// Response from `GET /file-info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfoResponse {
    pub status: LinkStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub remaining_downloads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_iso: Option<String>,
}

impl FileInfoResponse {
    pub fn remaining(&self) -> Option<u32> {
        self.remaining_downloads.map(clamp_remaining)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at_iso.as_deref().and_then(parse_expiry)
    }
}

/// Response from `GET /download`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: LinkStatus,
    /// One-time transfer target, present only when `status` is ok
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub remaining_downloads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_iso: Option<String>,
}

impl DownloadResponse {
    pub fn remaining(&self) -> Option<u32> {
        self.remaining_downloads.map(clamp_remaining)
    }
}

/// Health check body from `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

fn clamp_remaining(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Parse an expiry timestamp. The API appends `Z` to offsets that are already
/// explicit (`...+00:00Z`), so that suffix is dropped before RFC 3339 parsing.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let candidate = match raw.strip_suffix('Z') {
        Some(head) if has_explicit_offset(head) => head,
        _ => raw,
    };

    DateTime::parse_from_rfc3339(candidate)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn has_explicit_offset(s: &str) -> bool {
    // Offset is the last six characters, e.g. "+00:00".
    s.len() > 6
        && s.is_char_boundary(s.len() - 6)
        && matches!(s.as_bytes()[s.len() - 6], b'+' | b'-')
        && s.as_bytes()[s.len() - 3] == b':'
}
