//! S3 PutObject Library
//!
//! Models an S3 PutObject request and projects it onto the exact set of
//! headers the storage service expects.
//!
//! # Features
//!
//! - **Immutable Requests**: built once through a consuming builder
//! - **Canonical Headers**: deterministic, documented header order
//! - **Case-Insensitive Metadata**: multi-valued `x-amz-meta-*` entries
//! - **Pluggable Transport**: any [`s3::HttpSender`], `reqwest` by default
//!
//! # Example
//!
//! ```
//! use s3_put_object::upload::{headers, PutObjectRequest};
//!
//! # fn main() -> Result<(), s3_put_object::upload::UploadError> {
//! let request = PutObjectRequest::builder()
//!     .data(b"Hello, World!".to_vec())
//!     .with_cache_control("no-cache")
//!     .build()?;
//!
//! assert_eq!(
//!     headers(&request),
//!     vec![("Cache-Control".to_string(), "no-cache".to_string())]
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod s3;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use upload::{headers, PutObjectRequest, PutObjectRequestBuilder, UploadError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
