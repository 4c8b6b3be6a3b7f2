//! S3 Client module
//!
//! Sends [`PutObjectRequest`]s through a pluggable [`HttpSender`].
//!
//! # Example
//!
//! ```no_run
//! use s3_put_object::s3::{S3Client, S3ClientConfig};
//! use s3_put_object::upload::PutObjectRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = S3ClientConfig {
//!     bucket: "my-bucket".to_string(),
//!     region: "us-east-1".to_string(),
//!     endpoint: Some("http://localhost:9000".to_string()),
//!     timeout: None,
//! };
//! let client = S3Client::new(config)?;
//!
//! let request = PutObjectRequest::builder()
//!     .data(b"Hello, World!".to_vec())
//!     .with_content_type("text/plain")
//!     .build()?;
//! let response = client.put_object("hello.txt", &request).await?;
//! println!("ETag: {}", response.etag);
//! # Ok(())
//! # }
//! ```
//!
//! # Tracing
//!
//! | Operation | Span Name | Attributes |
//! |-----------|-----------|------------|
//! | PutObject | `s3.put_object` | bucket, key, method, bytes, headers, etag, status_code |

use crate::metrics;
use crate::upload::{headers, PutObjectRequest};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod sender;
pub mod types;

pub use sender::{HttpRequest, HttpResponse, HttpSender, Method, ReqwestSender};
pub use types::{CannedAcl, StorageClass};

/// Characters escaped in object keys; `/` is kept as a path separator
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// S3 client errors
#[derive(Error, Debug)]
pub enum S3ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Response error: {0}")]
    ResponseError(String),
}

/// S3 Client configuration
#[derive(Debug, Clone)]
pub struct S3ClientConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
}

impl S3ClientConfig {
    /// Endpoint URL, defaulting to the regional AWS endpoint
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.region))
    }
}

/// S3 PutObject response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3PutObjectResponse {
    pub etag: String,
    pub version_id: Option<String>,
    pub status: u16,
}

/// S3 Client
pub struct S3Client<S = ReqwestSender> {
    config: S3ClientConfig,
    sender: S,
}

impl S3Client<ReqwestSender> {
    /// Create a client that sends through `reqwest`
    pub fn new(config: S3ClientConfig) -> Result<Self, S3ClientError> {
        let sender = ReqwestSender::new(&config.endpoint(), config.timeout)?;
        Ok(Self { config, sender })
    }
}

impl<S: HttpSender> S3Client<S> {
    /// Create a client with a custom sender
    pub fn with_sender(config: S3ClientConfig, sender: S) -> Self {
        Self { config, sender }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Get the region
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Path-style request path for `key`
    pub fn object_path(&self, key: &str) -> String {
        format!(
            "/{}/{}",
            self.config.bucket,
            utf8_percent_encode(key.trim_start_matches('/'), KEY_ENCODE_SET)
        )
    }

    /// Upload an object (PutObject)
    ///
    /// The request is projected with [`headers`] and sent with its payload
    /// as the body. Any non-2xx status is returned as
    /// [`S3ClientError::ResponseError`].
    #[tracing::instrument(
        name = "s3.put_object",
        skip(self, request),
        fields(
            s3.bucket = %self.config.bucket,
            s3.key = %key,
            http.method = "PUT",
            upload.bytes = request.data().len(),
            upload.headers = tracing::field::Empty,
            s3.etag = tracing::field::Empty,
            http.status_code = tracing::field::Empty
        ),
        err
    )]
    pub async fn put_object(
        &self,
        key: &str,
        request: &PutObjectRequest,
    ) -> Result<S3PutObjectResponse, S3ClientError> {
        let start_time = Instant::now();
        let bucket = self.config.bucket.as_str();
        let bytes = request.data().len() as u64;

        let header_list = headers(request);
        let span = tracing::Span::current();
        span.record("upload.headers", header_list.len());
        metrics::record_headers_emitted(header_list.len());

        let http_request = HttpRequest {
            method: Method::PUT,
            path: self.object_path(key),
            headers: header_list,
            body: request.data().clone(),
        };

        let result = self.sender.send(http_request).await;
        let duration = start_time.elapsed();
        metrics::record_put_object_duration(bucket, duration.as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_put_object_failure(bucket);
                metrics::record_error("transport");
                tracing::error!(
                    error = %e,
                    duration_ms = duration.as_millis(),
                    "PutObject request failed"
                );
                return Err(e);
            }
        };

        span.record("http.status_code", response.status);

        if !response.is_success() {
            metrics::record_put_object_failure(bucket);
            metrics::record_error("s3_response");
            let body = String::from_utf8_lossy(&response.body);
            tracing::error!(
                status = response.status,
                duration_ms = duration.as_millis(),
                "PutObject rejected"
            );
            return Err(S3ClientError::ResponseError(format!(
                "PutObject returned status {}: {}",
                response.status,
                body.trim()
            )));
        }

        let etag = response.header("ETag").unwrap_or_default().to_string();
        let version_id = response.header("x-amz-version-id").map(str::to_string);
        span.record("s3.etag", etag.as_str());

        metrics::record_put_object_success(bucket, bytes);
        tracing::info!(
            etag = %etag,
            version_id = ?version_id,
            bytes = bytes,
            duration_ms = duration.as_millis(),
            "PutObject completed"
        );

        Ok(S3PutObjectResponse {
            etag,
            version_id,
            status: response.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::sender::MockHttpSender;
    use super::*;
    use bytes::Bytes;

    fn test_config() -> S3ClientConfig {
        S3ClientConfig {
            bucket: "test-bucket".into(),
            region: "us-east-1".into(),
            endpoint: Some("http://localhost:9000".into()),
            timeout: None,
        }
    }

    fn ok_response(etag: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("etag".to_string(), etag.to_string())],
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_default_endpoint() {
        let config = S3ClientConfig {
            endpoint: None,
            region: "us-west-2".into(),
            ..test_config()
        };

        let client = S3Client::new(config).unwrap();
        assert_eq!(client.endpoint(), "https://s3.us-west-2.amazonaws.com");
    }

    #[test]
    fn test_custom_endpoint() {
        let client = S3Client::new(test_config()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000");
        assert_eq!(client.bucket(), "test-bucket");
        assert_eq!(client.region(), "us-east-1");
    }

    #[test]
    fn test_object_path_encoding() {
        let client = S3Client::with_sender(test_config(), MockHttpSender::new());
        assert_eq!(
            client.object_path("dir/my file+1.txt"),
            "/test-bucket/dir/my%20file%2B1.txt"
        );
        assert_eq!(client.object_path("/leading"), "/test-bucket/leading");
    }

    #[tokio::test]
    async fn test_put_object_sends_projected_headers() {
        let mut sender = MockHttpSender::new();
        sender
            .expect_send()
            .withf(|req: &HttpRequest| {
                req.method == Method::PUT
                    && req.path == "/test-bucket/hello.txt"
                    && req.body.as_ref() == b"hello"
                    && req.headers
                        == vec![
                            ("Content-Type".to_string(), "text/plain".to_string()),
                            ("x-amz-acl".to_string(), "private".to_string()),
                        ]
            })
            .times(1)
            .returning(|_| Ok(ok_response("\"abc\"")));

        let client = S3Client::with_sender(test_config(), sender);
        let request = PutObjectRequest::builder()
            .data(&b"hello"[..])
            .with_content_type("text/plain")
            .with_acl(CannedAcl::Private)
            .build()
            .unwrap();

        let response = client.put_object("hello.txt", &request).await.unwrap();
        assert_eq!(response.etag, "\"abc\"");
        assert_eq!(response.status, 200);
        assert_eq!(response.version_id, None);
    }

    #[tokio::test]
    async fn test_put_object_error_status() {
        let mut sender = MockHttpSender::new();
        sender.expect_send().returning(|_| {
            Ok(HttpResponse {
                status: 400,
                headers: vec![],
                body: Bytes::from_static(b"<Error><Code>InvalidArgument</Code></Error>"),
            })
        });

        let client = S3Client::with_sender(test_config(), sender);
        let request = PutObjectRequest::builder()
            .data(&b"x"[..])
            .with_grant_read("not a grantee")
            .build()
            .unwrap();

        let err = client.put_object("k", &request).await.unwrap_err();
        match err {
            S3ClientError::ResponseError(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("InvalidArgument"));
            }
            other => panic!("Expected ResponseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_put_object_transport_error() {
        let mut sender = MockHttpSender::new();
        sender
            .expect_send()
            .returning(|_| Err(S3ClientError::RequestError("connection refused".into())));

        let client = S3Client::with_sender(test_config(), sender);
        let request = PutObjectRequest::builder().data(&b"x"[..]).build().unwrap();

        let result = client.put_object("k", &request).await;
        assert!(matches!(result, Err(S3ClientError::RequestError(_))));
    }
}
