//! Data models for the sharing API
//!
//! Wire types for the upload, file-info and download endpoints, plus the
//! option types offered by the upload form.

mod download;
mod options;
mod upload;

pub use download::*;
pub use options::*;
pub use upload::*;
