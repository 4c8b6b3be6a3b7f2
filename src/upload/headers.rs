//! PutObject header projection
//!
//! Maps a [`PutObjectRequest`] onto the headers S3 expects on a PutObject
//! call. Unset attributes produce no header at all; there are never
//! empty-valued headers for absent fields.
//!
//! Headers come out in a fixed order:
//!
//! | # | Header | Source |
//! |---|--------|--------|
//! | 1 | `Cache-Control` | `cache_control` |
//! | 2 | `Content-Disposition` | `content_disposition` |
//! | 3 | `Content-Encoding` | `content_encoding` |
//! | 4 | `Content-MD5` | `content_md5` |
//! | 5 | `Content-Type` | `content_type` |
//! | 6 | `Expires` | `expires` |
//! | 7 | `x-amz-meta-<key>` | `metadata`, one line per value, keys in first-seen order |
//! | 8 | `x-amz-storage-class` | `storage_class` token |
//! | 9 | `x-amz-tagging` | `tagging` |
//! | 10 | `x-amz-website-redirect-location` | `website_redirect_location` |
//! | 11 | `x-amz-acl` | `acl` token |
//! | 12 | `x-amz-grant-read` | `grant_read` |
//! | 13 | `x-amz-grant-write` | `grant_write` |
//! | 14 | `x-amz-grant-read-acp` | `grant_read_acp` |
//! | 15 | `x-amz-grant-write-acp` | `grant_write_acp` |
//! | 16 | `x-amz-grant-full-control` | `grant_full_control` |

use super::PutObjectRequest;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const EXPIRES: &str = "Expires";

pub const X_AMZ_META_PREFIX: &str = "x-amz-meta-";
pub const X_AMZ_STORAGE_CLASS: &str = "x-amz-storage-class";
pub const X_AMZ_TAGGING: &str = "x-amz-tagging";
pub const X_AMZ_WEBSITE_REDIRECT_LOCATION: &str = "x-amz-website-redirect-location";

pub const X_AMZ_ACL: &str = "x-amz-acl";
pub const X_AMZ_GRANT_READ: &str = "x-amz-grant-read";
pub const X_AMZ_GRANT_WRITE: &str = "x-amz-grant-write";
pub const X_AMZ_GRANT_READ_ACP: &str = "x-amz-grant-read-acp";
pub const X_AMZ_GRANT_WRITE_ACP: &str = "x-amz-grant-write-acp";
pub const X_AMZ_GRANT_FULL_CONTROL: &str = "x-amz-grant-full-control";

/// Ordered `(name, value)` header list
pub type HeaderList = Vec<(String, String)>;

/// Project `request` onto its PutObject headers
///
/// Pure and deterministic: the same request always yields the same list in
/// the order documented at module level.
pub fn headers(request: &PutObjectRequest) -> HeaderList {
    let mut headers = HeaderList::new();

    push(&mut headers, CACHE_CONTROL, request.cache_control());
    push(&mut headers, CONTENT_DISPOSITION, request.content_disposition());
    push(&mut headers, CONTENT_ENCODING, request.content_encoding());
    push(&mut headers, CONTENT_MD5, request.content_md5());
    push(&mut headers, CONTENT_TYPE, request.content_type());
    push(&mut headers, EXPIRES, request.expires());

    for (key, value) in request.metadata().iter_pairs() {
        headers.push((
            format!("{}{}", X_AMZ_META_PREFIX, key.to_ascii_lowercase()),
            value.to_string(),
        ));
    }

    push(
        &mut headers,
        X_AMZ_STORAGE_CLASS,
        request.storage_class().map(|class| class.as_str()),
    );
    push(&mut headers, X_AMZ_TAGGING, request.tagging());
    push(
        &mut headers,
        X_AMZ_WEBSITE_REDIRECT_LOCATION,
        request.website_redirect_location(),
    );

    push(&mut headers, X_AMZ_ACL, request.acl().map(|acl| acl.as_str()));
    push(&mut headers, X_AMZ_GRANT_READ, request.grant_read());
    push(&mut headers, X_AMZ_GRANT_WRITE, request.grant_write());
    push(&mut headers, X_AMZ_GRANT_READ_ACP, request.grant_read_acp());
    push(&mut headers, X_AMZ_GRANT_WRITE_ACP, request.grant_write_acp());
    push(
        &mut headers,
        X_AMZ_GRANT_FULL_CONTROL,
        request.grant_full_control(),
    );

    headers
}

fn push(headers: &mut HeaderList, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        headers.push((name.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::{CannedAcl, StorageClass};
    use crate::upload::PutObjectRequestBuilder;

    fn pairs(headers: &HeaderList) -> Vec<(&str, &str)> {
        headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn test_fresh_request_has_no_headers() {
        let request = PutObjectRequestBuilder::new(&b"payload"[..]).build().unwrap();
        assert!(headers(&request).is_empty());
    }

    #[test]
    fn test_single_cache_control() {
        let request = PutObjectRequestBuilder::new(&b"payload"[..])
            .with_cache_control("no-cache")
            .build()
            .unwrap();

        assert_eq!(pairs(&headers(&request)), [("Cache-Control", "no-cache")]);
    }

    #[test]
    fn test_full_order() {
        let request = PutObjectRequestBuilder::new(&b"payload"[..])
            .with_grant_full_control("id=\"full\"")
            .with_grant_write_acp("id=\"wacp\"")
            .with_grant_read_acp("id=\"racp\"")
            .with_grant_write("id=\"w\"")
            .with_grant_read("uri=\"http://acs.amazonaws.com/groups/global/AllUsers\"")
            .with_acl(CannedAcl::BucketOwnerFullControl)
            .with_website_redirect_location("/other")
            .with_tagging("team=storage&env=prod")
            .with_storage_class(StorageClass::ReducedRedundancy)
            .with_metadata("Color", "blue")
            .with_expires("Thu, 01 Dec 1994 16:00:00 GMT")
            .with_content_type("text/plain")
            .with_content_md5("XUFAKrxLKna5cZ2REBfFkg==")
            .with_content_encoding("gzip")
            .with_content_disposition("attachment; filename=\"a.txt\"")
            .with_cache_control("no-cache")
            .build()
            .unwrap();

        assert_eq!(
            pairs(&headers(&request)),
            [
                ("Cache-Control", "no-cache"),
                ("Content-Disposition", "attachment; filename=\"a.txt\""),
                ("Content-Encoding", "gzip"),
                ("Content-MD5", "XUFAKrxLKna5cZ2REBfFkg=="),
                ("Content-Type", "text/plain"),
                ("Expires", "Thu, 01 Dec 1994 16:00:00 GMT"),
                ("x-amz-meta-color", "blue"),
                ("x-amz-storage-class", "REDUCED_REDUNDANCY"),
                ("x-amz-tagging", "team=storage&env=prod"),
                ("x-amz-website-redirect-location", "/other"),
                ("x-amz-acl", "bucket-owner-full-control"),
                (
                    "x-amz-grant-read",
                    "uri=\"http://acs.amazonaws.com/groups/global/AllUsers\""
                ),
                ("x-amz-grant-write", "id=\"w\""),
                ("x-amz-grant-read-acp", "id=\"racp\""),
                ("x-amz-grant-write-acp", "id=\"wacp\""),
                ("x-amz-grant-full-control", "id=\"full\""),
            ]
        );
    }

    #[test]
    fn test_metadata_values_are_separate_lines() {
        let request = PutObjectRequestBuilder::new(&b"payload"[..])
            .with_metadata("Key", "a")
            .with_metadata("key", "b")
            .build()
            .unwrap();

        assert_eq!(
            pairs(&headers(&request)),
            [("x-amz-meta-key", "a"), ("x-amz-meta-key", "b")]
        );
    }

    #[test]
    fn test_empty_value_is_emitted_when_set() {
        let request = PutObjectRequestBuilder::new(&b"payload"[..])
            .with_content_type("")
            .build()
            .unwrap();

        assert_eq!(pairs(&headers(&request)), [("Content-Type", "")]);
    }
}
