//! PutObject request model
//!
//! A [`PutObjectRequest`] is assembled through [`PutObjectRequestBuilder`]
//! and is read-only once built. The builder is consumed by every `with_*`
//! call, so a request handed to the client can no longer be changed by the
//! code that assembled it.
//!
//! # Example
//!
//! ```
//! use s3_put_object::s3::{CannedAcl, StorageClass};
//! use s3_put_object::upload::{headers, PutObjectRequest};
//!
//! # fn example() -> Result<(), s3_put_object::upload::UploadError> {
//! let request = PutObjectRequest::builder()
//!     .data(b"Hello, World!".to_vec())
//!     .with_content_type("text/plain")
//!     .with_metadata("Owner", "alice")
//!     .with_storage_class(StorageClass::StandardIa)
//!     .with_acl(CannedAcl::Private)
//!     .build()?;
//!
//! assert_eq!(request.content_type(), Some("text/plain"));
//! assert_eq!(headers(&request).len(), 4);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use super::{UploadError, UserMetadata};
use crate::s3::{CannedAcl, StorageClass};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use md5::{Digest, Md5};
use std::fmt;

/// A single-part object upload: payload plus optional attributes
///
/// Every attribute other than the payload is `None` (or empty, for
/// metadata) unless it was set on the builder.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PutObjectRequest {
    data: Bytes,

    cache_control: Option<String>,
    content_disposition: Option<String>,
    content_encoding: Option<String>,
    content_md5: Option<String>,
    content_type: Option<String>,
    expires: Option<String>,

    metadata: UserMetadata,
    storage_class: Option<StorageClass>,
    tagging: Option<String>,
    website_redirect_location: Option<String>,

    acl: Option<CannedAcl>,
    grant_read: Option<String>,
    grant_write: Option<String>,
    grant_read_acp: Option<String>,
    grant_write_acp: Option<String>,
    grant_full_control: Option<String>,
}

impl PutObjectRequest {
    /// Start assembling a request
    pub fn builder() -> PutObjectRequestBuilder {
        PutObjectRequestBuilder::default()
    }

    /// Reopen this request as a draft
    ///
    /// A `Content-MD5` that matches the payload is treated as computed, so it
    /// is recomputed if the draft's payload is replaced.
    pub fn into_builder(self) -> PutObjectRequestBuilder {
        let compute_md5 = self.content_md5.as_deref() == Some(md5_digest(&self.data).as_str());

        PutObjectRequestBuilder {
            data: Some(self.data),
            compute_md5,
            cache_control: self.cache_control,
            content_disposition: self.content_disposition,
            content_encoding: self.content_encoding,
            content_md5: self.content_md5,
            content_type: self.content_type,
            expires: self.expires,
            metadata: self.metadata,
            storage_class: self.storage_class,
            tagging: self.tagging,
            website_redirect_location: self.website_redirect_location,
            acl: self.acl,
            grant_read: self.grant_read,
            grant_write: self.grant_write,
            grant_read_acp: self.grant_read_acp,
            grant_write_acp: self.grant_write_acp,
            grant_full_control: self.grant_full_control,
        }
    }

    /// Object payload
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    /// Base64-encoded MD5 digest of the payload, sent as `Content-MD5`
    pub fn content_md5(&self) -> Option<&str> {
        self.content_md5.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn expires(&self) -> Option<&str> {
        self.expires.as_deref()
    }

    /// User metadata, sent as `x-amz-meta-*`
    pub fn metadata(&self) -> &UserMetadata {
        &self.metadata
    }

    pub fn storage_class(&self) -> Option<StorageClass> {
        self.storage_class
    }

    /// URL-encoded tag set, passed through untouched
    pub fn tagging(&self) -> Option<&str> {
        self.tagging.as_deref()
    }

    pub fn website_redirect_location(&self) -> Option<&str> {
        self.website_redirect_location.as_deref()
    }

    pub fn acl(&self) -> Option<CannedAcl> {
        self.acl
    }

    pub fn grant_read(&self) -> Option<&str> {
        self.grant_read.as_deref()
    }

    pub fn grant_write(&self) -> Option<&str> {
        self.grant_write.as_deref()
    }

    pub fn grant_read_acp(&self) -> Option<&str> {
        self.grant_read_acp.as_deref()
    }

    pub fn grant_write_acp(&self) -> Option<&str> {
        self.grant_write_acp.as_deref()
    }

    pub fn grant_full_control(&self) -> Option<&str> {
        self.grant_full_control.as_deref()
    }
}

// Written out by hand so the payload shows up as a length, not its bytes.
impl fmt::Debug for PutObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutObjectRequest")
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("cache_control", &self.cache_control)
            .field("content_disposition", &self.content_disposition)
            .field("content_encoding", &self.content_encoding)
            .field("content_md5", &self.content_md5)
            .field("content_type", &self.content_type)
            .field("expires", &self.expires)
            .field("metadata", &self.metadata)
            .field("storage_class", &self.storage_class)
            .field("tagging", &self.tagging)
            .field("website_redirect_location", &self.website_redirect_location)
            .field("acl", &self.acl)
            .field("grant_read", &self.grant_read)
            .field("grant_write", &self.grant_write)
            .field("grant_read_acp", &self.grant_read_acp)
            .field("grant_write_acp", &self.grant_write_acp)
            .field("grant_full_control", &self.grant_full_control)
            .finish()
    }
}

/// Draft of a [`PutObjectRequest`]
///
/// Simple attributes follow last-write-wins. Metadata accumulates: setting
/// the same key twice (in any case) keeps both values. Values are stored
/// verbatim; nothing here checks them against what S3 accepts.
#[derive(Debug, Clone, Default)]
pub struct PutObjectRequestBuilder {
    data: Option<Bytes>,
    compute_md5: bool,

    cache_control: Option<String>,
    content_disposition: Option<String>,
    content_encoding: Option<String>,
    content_md5: Option<String>,
    content_type: Option<String>,
    expires: Option<String>,

    metadata: UserMetadata,
    storage_class: Option<StorageClass>,
    tagging: Option<String>,
    website_redirect_location: Option<String>,

    acl: Option<CannedAcl>,
    grant_read: Option<String>,
    grant_write: Option<String>,
    grant_read_acp: Option<String>,
    grant_write_acp: Option<String>,
    grant_full_control: Option<String>,
}

impl PutObjectRequestBuilder {
    /// Start a draft with the payload already set
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::default().data(data)
    }

    /// Set the payload
    ///
    /// A `Vec<u8>` is moved in without copying; `&'static [u8]` is shared.
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the payload to a copy of `data`
    pub fn data_from_slice(mut self, data: &[u8]) -> Self {
        self.data = Some(Bytes::copy_from_slice(data));
        self
    }

    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn with_content_disposition(mut self, content_disposition: impl Into<String>) -> Self {
        self.content_disposition = Some(content_disposition.into());
        self
    }

    pub fn with_content_encoding(mut self, content_encoding: impl Into<String>) -> Self {
        self.content_encoding = Some(content_encoding.into());
        self
    }

    pub fn with_content_md5(mut self, content_md5: impl Into<String>) -> Self {
        self.content_md5 = Some(content_md5.into());
        self.compute_md5 = false;
        self
    }

    /// Derive `Content-MD5` from the payload when the draft is built
    ///
    /// The digest always covers the final payload, whenever it is set. A
    /// later `with_content_md5` replaces it.
    pub fn with_computed_content_md5(mut self) -> Self {
        self.compute_md5 = true;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    /// Append one metadata value under `key`
    pub fn with_metadata(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Append every entry of `metadata`
    pub fn with_metadata_entries<I, K, V>(mut self, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.metadata.extend(metadata);
        self
    }

    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = Some(storage_class);
        self
    }

    pub fn with_tagging(mut self, tagging: impl Into<String>) -> Self {
        self.tagging = Some(tagging.into());
        self
    }

    pub fn with_website_redirect_location(mut self, location: impl Into<String>) -> Self {
        self.website_redirect_location = Some(location.into());
        self
    }

    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_grant_read(mut self, grantees: impl Into<String>) -> Self {
        self.grant_read = Some(grantees.into());
        self
    }

    pub fn with_grant_write(mut self, grantees: impl Into<String>) -> Self {
        self.grant_write = Some(grantees.into());
        self
    }

    pub fn with_grant_read_acp(mut self, grantees: impl Into<String>) -> Self {
        self.grant_read_acp = Some(grantees.into());
        self
    }

    pub fn with_grant_write_acp(mut self, grantees: impl Into<String>) -> Self {
        self.grant_write_acp = Some(grantees.into());
        self
    }

    pub fn with_grant_full_control(mut self, grantees: impl Into<String>) -> Self {
        self.grant_full_control = Some(grantees.into());
        self
    }

    /// Finish the draft
    ///
    /// # Errors
    ///
    /// [`UploadError::InvalidArgument`] when no payload was set.
    pub fn build(self) -> Result<PutObjectRequest, UploadError> {
        let data = self
            .data
            .ok_or_else(|| UploadError::InvalidArgument("data must not be null".into()))?;
        let content_md5 = if self.compute_md5 {
            Some(md5_digest(&data))
        } else {
            self.content_md5
        };

        Ok(PutObjectRequest {
            data,
            cache_control: self.cache_control,
            content_disposition: self.content_disposition,
            content_encoding: self.content_encoding,
            content_md5,
            content_type: self.content_type,
            expires: self.expires,
            metadata: self.metadata,
            storage_class: self.storage_class,
            tagging: self.tagging,
            website_redirect_location: self.website_redirect_location,
            acl: self.acl,
            grant_read: self.grant_read,
            grant_write: self.grant_write,
            grant_read_acp: self.grant_read_acp,
            grant_write_acp: self.grant_write_acp,
            grant_full_control: self.grant_full_control,
        })
    }
}

/// Base64 of the payload's MD5, as S3 expects in `Content-MD5`
fn md5_digest(data: &[u8]) -> String {
    BASE64.encode(Md5::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_data_fails() {
        let result = PutObjectRequest::builder()
            .with_content_type("text/plain")
            .build();

        assert!(matches!(result, Err(UploadError::InvalidArgument(_))));
    }

    #[test]
    fn test_fresh_request_has_only_payload() {
        let request = PutObjectRequestBuilder::new(&b"abc"[..]).build().unwrap();

        assert_eq!(request.data().as_ref(), b"abc");
        assert_eq!(request.cache_control(), None);
        assert_eq!(request.content_md5(), None);
        assert_eq!(request.storage_class(), None);
        assert_eq!(request.acl(), None);
        assert!(request.metadata().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let request = PutObjectRequestBuilder::new(Bytes::from_static(b"x"))
            .with_cache_control("no-cache")
            .with_cache_control("max-age=60")
            .with_acl(CannedAcl::Private)
            .with_acl(CannedAcl::PublicRead)
            .build()
            .unwrap();

        assert_eq!(request.cache_control(), Some("max-age=60"));
        assert_eq!(request.acl(), Some(CannedAcl::PublicRead));
    }

    #[test]
    fn test_empty_string_is_kept_verbatim() {
        let request = PutObjectRequestBuilder::new(Bytes::new())
            .with_tagging("")
            .build()
            .unwrap();

        assert_eq!(request.tagging(), Some(""));
        assert!(request.data().is_empty());
    }

    #[test]
    fn test_computed_content_md5() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        let request = PutObjectRequestBuilder::new(Bytes::new())
            .with_computed_content_md5()
            .build()
            .unwrap();

        assert_eq!(request.content_md5(), Some("1B2M2Y8AsgTpgAmY7PhCfg=="));
    }

    #[test]
    fn test_computed_content_md5_follows_replaced_payload() {
        let request = PutObjectRequest::builder()
            .data(&b"first"[..])
            .with_computed_content_md5()
            .data(&b"second"[..])
            .build()
            .unwrap();

        assert_eq!(request.content_md5(), Some("qfDmGhN9hqqdtTRl4IAWEg=="));
    }

    #[test]
    fn test_computed_content_md5_before_payload() {
        let request = PutObjectRequest::builder()
            .with_computed_content_md5()
            .data(&b"first"[..])
            .build()
            .unwrap();

        assert_eq!(request.content_md5(), Some("iwTV43ddKY54RV78XKQE1Q=="));
    }

    #[test]
    fn test_computed_content_md5_after_into_builder() {
        let request = PutObjectRequestBuilder::new(&b"first"[..])
            .with_computed_content_md5()
            .build()
            .unwrap();
        assert_eq!(request.content_md5(), Some("iwTV43ddKY54RV78XKQE1Q=="));

        let reopened = request.into_builder().data(&b"second"[..]).build().unwrap();
        assert_eq!(reopened.content_md5(), Some("qfDmGhN9hqqdtTRl4IAWEg=="));
    }

    #[test]
    fn test_explicit_content_md5_is_kept() {
        let request = PutObjectRequestBuilder::new(&b"first"[..])
            .with_computed_content_md5()
            .with_content_md5("caller-supplied")
            .build()
            .unwrap();
        assert_eq!(request.content_md5(), Some("caller-supplied"));

        let reopened = request.into_builder().data(&b"second"[..]).build().unwrap();
        assert_eq!(reopened.content_md5(), Some("caller-supplied"));
    }

    #[test]
    fn test_data_from_slice_copies() {
        let mut buffer = b"original".to_vec();
        let request = PutObjectRequest::builder()
            .data_from_slice(&buffer)
            .build()
            .unwrap();

        buffer.copy_from_slice(b"mutated!");

        assert_eq!(request.data().as_ref(), b"original");
        assert_eq!(buffer, b"mutated!");
    }

    #[test]
    fn test_vec_payload_is_moved_not_copied() {
        let source = b"owned".to_vec();
        let ptr = source.as_ptr();
        let request = PutObjectRequest::builder().data(source).build().unwrap();

        assert_eq!(request.data().as_ptr(), ptr);
        assert_eq!(request.data().as_ref(), b"owned");
    }

    #[test]
    fn test_into_builder_round_trip() {
        let request = PutObjectRequestBuilder::new(&b"abc"[..])
            .with_metadata("k", "v")
            .with_grant_read("id=\"owner\"")
            .build()
            .unwrap();

        let reopened = request.clone().into_builder().build().unwrap();
        assert_eq!(reopened, request);

        let changed = request
            .clone()
            .into_builder()
            .with_metadata("K", "w")
            .build()
            .unwrap();
        assert_ne!(changed, request);
        assert_eq!(changed.metadata().get_all("k"), ["v", "w"]);
    }

    #[test]
    fn test_debug_lists_every_attribute() {
        let request = PutObjectRequestBuilder::new(vec![0u8; 2048])
            .with_content_type("application/octet-stream")
            .build()
            .unwrap();
        let rendered = format!("{:?}", request);

        assert!(rendered.contains("<2048 bytes>"));
        assert!(rendered.contains("content_type: Some(\"application/octet-stream\")"));
        for field in [
            "cache_control: None",
            "content_disposition: None",
            "content_encoding: None",
            "content_md5: None",
            "expires: None",
            "storage_class: None",
            "tagging: None",
            "website_redirect_location: None",
            "acl: None",
            "grant_read: None",
            "grant_write: None",
            "grant_read_acp: None",
            "grant_write_acp: None",
            "grant_full_control: None",
        ] {
            assert!(rendered.contains(field), "missing {field} in {rendered}");
        }
    }
}
