//! Error types module
//!
//! All failures of the sharelink client are unified under [`ShareError`]. Terminal
//! link states (expired, maxed, not found) are not errors; they travel as
//! [`crate::models::LinkStatus`] values inside successful responses.

use std::io;

/// Result alias used across the sharelink crates
pub type ShareResult<T> = Result<T, ShareError>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failed request
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether re-submitting the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the user
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid file ID: {0:?}")]
    InvalidFileId(String),

    /// The API answered with a non-2xx status
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The caller gave up on the operation before it finished
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ShareError {
    fn from(err: anyhow::Error) -> Self {
        ShareError::Internal(format!("{:#}", err))
    }
}

impl From<serde_json::Error> for ShareError {
    fn from(err: serde_json::Error) -> Self {
        ShareError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ShareError {
    fn from(err: validator::ValidationErrors) -> Self {
        ShareError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, sensitive, log_level).
fn share_error_static_metadata(err: &ShareError) -> (&'static str, bool, bool, LogLevel) {
    match err {
        ShareError::InvalidInput(_) => ("INVALID_INPUT", false, false, LogLevel::Debug),
        ShareError::InvalidFileId(_) => ("INVALID_FILE_ID", false, false, LogLevel::Debug),
        ShareError::Api { status, .. } if *status >= 500 => {
            ("API_ERROR", true, false, LogLevel::Warn)
        }
        ShareError::Api { .. } => ("API_ERROR", false, false, LogLevel::Debug),
        ShareError::Transport(_) => ("TRANSPORT_ERROR", true, true, LogLevel::Warn),
        ShareError::InvalidResponse(_) => ("INVALID_RESPONSE", true, true, LogLevel::Warn),
        ShareError::Config(_) => ("CONFIG_ERROR", false, false, LogLevel::Error),
        ShareError::Io(_) => ("IO_ERROR", false, true, LogLevel::Error),
        ShareError::Cancelled => ("CANCELLED", true, false, LogLevel::Debug),
        ShareError::Internal(_) => ("INTERNAL_ERROR", false, true, LogLevel::Error),
    }
}

impl ShareError {
    /// HTTP status carried by an API error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ShareError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Log an error at the level its metadata assigns.
pub fn log_error(error: &ShareError, context: &str) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code = error_code, "{}", context);
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code = error_code, "{}", context);
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code = error_code, "{}", context);
        }
    }
}

impl ErrorMetadata for ShareError {
    fn error_code(&self) -> &'static str {
        share_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        share_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        share_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        share_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            ShareError::InvalidInput(ref msg) => msg.clone(),
            ShareError::InvalidFileId(_) => "Invalid file ID".to_string(),
            ShareError::Api { status, body } => format!("{} - {}", status, body),
            ShareError::Transport(_) => "Unable to reach the sharing service".to_string(),
            ShareError::InvalidResponse(_) => {
                "Unexpected response from the sharing service".to_string()
            }
            ShareError::Config(ref msg) => msg.clone(),
            ShareError::Io(ref err) if err.kind() == io::ErrorKind::AlreadyExists => {
                "Destination file already exists".to_string()
            }
            ShareError::Io(_) => "Local file error".to_string(),
            ShareError::Cancelled => "Cancelled".to_string(),
            ShareError::Internal(_) => "Internal error".to_string(),
        }
    }
}
