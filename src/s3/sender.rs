//! HTTP transport seam
//!
//! The client never talks to the network directly. It hands a fully formed
//! [`HttpRequest`] to an [`HttpSender`] and gets back the raw status,
//! headers and body. Signing and retries, when wanted, belong in a sender.

use super::S3ClientError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
pub use reqwest::Method;
use std::time::Duration;

/// Outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute path, already percent-encoded
    pub path: String,
    /// Header lines in send order; a name may repeat
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Raw response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    /// First value of `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns the raw response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3ClientError>;
}

/// [`HttpSender`] backed by `reqwest`
///
/// Paths are appended to a fixed endpoint (path-style addressing).
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    endpoint: String,
    client: reqwest::Client,
}

impl ReqwestSender {
    /// Create a sender for `endpoint` (scheme and authority, no path)
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, S3ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| S3ClientError::ConfigError(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build a header map, keeping repeated names as separate entries
fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap, S3ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| S3ClientError::RequestError(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| S3ClientError::RequestError(format!("header '{}': {}", name, e)))?;
        map.append(name, value);
    }
    Ok(map)
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3ClientError> {
        let url = format!("{}{}", self.endpoint, request.path);
        let headers = to_header_map(&request.headers)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            headers = request.headers.len(),
            bytes = request.body.len(),
            "Sending request"
        );

        let response = self
            .client
            .request(request.method, &url)
            .headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| S3ClientError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| S3ClientError::ResponseError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
