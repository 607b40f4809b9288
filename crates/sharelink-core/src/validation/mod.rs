//! Validation modules

pub mod file;
pub mod file_id;

pub use file::{
    is_allowed_mime_type, validate_file, FileRejection, ALLOWED_MIME_TYPES,
    ALLOWED_MIME_TYPE_PREFIXES, MAX_FILE_SIZE_BYTES,
};
pub use file_id::{file_id_from_share_url, validate_file_id, MAX_FILE_ID_LENGTH};
