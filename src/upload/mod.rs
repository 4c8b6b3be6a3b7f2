//! Upload module
//!
//! The PutObject request model and its projection onto S3 request headers.

use thiserror::Error;

pub mod headers;
pub mod metadata;
pub mod put_object;

pub use headers::headers;
pub use metadata::UserMetadata;
pub use put_object::{PutObjectRequest, PutObjectRequestBuilder};

/// Upload errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
