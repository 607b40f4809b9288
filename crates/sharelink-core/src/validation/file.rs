//! Local file validation
//!
//! Rejects files before any network call:
//! - Size: at most [`MAX_FILE_SIZE_BYTES`]
//! - Type: MIME prefix or exact allow-list
//!
//! These checks only avoid wasted uploads; the API enforces its own limits.

/// Maximum upload size (5 MiB)
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME type prefixes accepted for upload
pub const ALLOWED_MIME_TYPE_PREFIXES: &[&str] = &[
    "image/",
    "text/",
    "video/",
    "audio/",
    "application/vnd.openxmlformats",
];

/// MIME types accepted by exact match
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/zip",
    "application/json",
    "application/msword",
];

/// Reason a file was rejected locally
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("File size must be under 5MB")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("File type not allowed. Supported: images, documents, videos, audio, text files")]
    UnsupportedType(String),
}

/// Validate a candidate file by declared size and MIME type.
///
/// The size rule is checked first, so an oversized file is reported as
/// [`FileRejection::FileTooLarge`] whatever its type.
pub fn validate_file(size_bytes: u64, mime_type: &str) -> Result<(), FileRejection> {
    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(FileRejection::FileTooLarge {
            size: size_bytes,
            limit: MAX_FILE_SIZE_BYTES,
        });
    }

    if !is_allowed_mime_type(mime_type) {
        return Err(FileRejection::UnsupportedType(mime_type.to_string()));
    }

    Ok(())
}

/// Whether a MIME type is on the upload allow-list. The string is matched
/// as given: no case folding and no parameter stripping.
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    if mime_type.is_empty() {
        return false;
    }

    ALLOWED_MIME_TYPE_PREFIXES
        .iter()
        .any(|prefix| mime_type.starts_with(prefix))
        || ALLOWED_MIME_TYPES.contains(&mime_type)
}
