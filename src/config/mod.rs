//! Configuration module
//!
//! Handles loading and parsing of YAML configuration files with support for
//! environment variable expansion and validation.
//!
//! # Example
//!
//! ```yaml
//! s3:
//!   bucket: "uploads"
//!   region: "us-east-1"
//!   endpoint: "${S3_ENDPOINT:-http://localhost:9000}"
//!
//! upload:
//!   storage_class: "STANDARD_IA"
//!   acl: "private"
//!   compute_md5: true
//! ```
//!
//! Storage class and ACL values go through the same parser as the command
//! line, so `glacier` and `PUBLIC_READ` are accepted alongside the canonical
//! `GLACIER` and `public-read`.

use crate::s3::{CannedAcl, S3ClientConfig, StorageClass};
use crate::upload::PutObjectRequestBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod loader;

pub use loader::{expand_env_vars, ConfigLoader};

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub s3: S3Config,
    #[serde(default)]
    pub upload: UploadDefaults,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        ConfigLoader::parse(content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.s3.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "s3.bucket must not be empty".into(),
            ));
        }

        if self.s3.region.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "s3.region must not be empty".into(),
            ));
        }

        if let Some(ref endpoint) = self.s3.endpoint {
            if !is_valid_http_url(endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid S3 endpoint '{}': must start with http:// or https://",
                    endpoint
                )));
            }
        }

        if self.s3.timeout_seconds == Some(0) {
            return Err(ConfigError::ValidationError(
                "s3.timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// S3 backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl S3Config {
    /// Client settings for this backend
    pub fn client_config(&self) -> S3ClientConfig {
        S3ClientConfig {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Attributes applied to every request unless the caller overrides them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDefaults {
    #[serde(default)]
    pub storage_class: Option<StorageClass>,
    #[serde(default)]
    pub acl: Option<CannedAcl>,
    #[serde(default)]
    pub cache_control: Option<String>,
    #[serde(default)]
    pub compute_md5: bool,
}

impl UploadDefaults {
    /// Seed a draft with these defaults
    ///
    /// MD5 is not computed here since it depends on the final payload; see
    /// [`PutObjectRequestBuilder::with_computed_content_md5`].
    pub fn apply(&self, mut builder: PutObjectRequestBuilder) -> PutObjectRequestBuilder {
        if let Some(class) = self.storage_class {
            builder = builder.with_storage_class(class);
        }
        if let Some(acl) = self.acl {
            builder = builder.with_acl(acl);
        }
        if let Some(ref cache_control) = self.cache_control {
            builder = builder.with_cache_control(cache_control.as_str());
        }
        builder
    }
}

/// Metrics configuration
///
/// When `enabled`, the CLI prints the metrics registry to stderr after an
/// upload. Off unless asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
}
