//! File identifier validation
//!
//! File ids are opaque tokens minted by the API. The client only checks that an
//! id can be sent as a query parameter without ambiguity.

use crate::error::{ShareError, ShareResult};

/// Maximum accepted length of a file id
pub const MAX_FILE_ID_LENGTH: usize = 128;

/// Validate a file id, returning it with surrounding whitespace trimmed.
///
/// Rules:
/// - ASCII letters, digits, underscore (_) and hyphen (-) only
/// - Maximum 128 characters
pub fn validate_file_id(file_id: &str) -> ShareResult<&str> {
    let trimmed = file_id.trim();

    if trimmed.is_empty() || trimmed.len() > MAX_FILE_ID_LENGTH {
        return Err(ShareError::InvalidFileId(file_id.to_string()));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ShareError::InvalidFileId(file_id.to_string()));
    }

    Ok(trimmed)
}

/// Extract the file id from a share-page URL (`https://site/file/<id>`).
///
/// Input that is not a URL is returned trimmed, so a bare id passes through.
/// The result still needs [`validate_file_id`].
pub fn file_id_from_share_url(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.contains("://") {
        return trimmed.to_string();
    }

    let path = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segment = match path.rsplit_once("/file/") {
        Some((_, id)) if !id.contains('/') => id,
        _ => return String::new(),
    };

    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}
