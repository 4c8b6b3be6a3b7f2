//! Configuration loader with environment variable expansion

use super::{Config, ConfigError};
use lazy_static::lazy_static;
use regex_lite::Regex;
use std::path::Path;

lazy_static! {
    // ${VAR} or ${VAR:-default}
    static ref ENV_VAR: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}").unwrap();
}

/// Expand environment variables in a string.
///
/// Supports two syntaxes:
/// - `${VAR_NAME}` - keeps the placeholder if the variable is not set
/// - `${VAR_NAME:-default}` - falls back to `default`
///
/// # Examples
///
/// ```
/// use s3_put_object::config::expand_env_vars;
///
/// let result = expand_env_vars("${S3PUT_DOC_UNSET_VAR:-fallback}");
/// assert_eq!(result, "fallback");
/// ```
pub fn expand_env_vars(s: &str) -> String {
    ENV_VAR
        .replace_all(s, |cap: &regex_lite::Captures<'_>| {
            match std::env::var(&cap[1]) {
                Ok(value) => value,
                Err(_) => match cap.get(2) {
                    Some(default) => default.as_str().to_string(),
                    None => cap[0].to_string(),
                },
            }
        })
        .into_owned()
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), bucket = %config.s3.bucket, "Loaded configuration");
        Ok(config)
    }

    /// Expand, parse and validate YAML content
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let expanded = expand_env_vars(content);
        let config: Config = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_expand_env_vars() {
        std::env::set_var("S3PUT_TEST_VAR", "test_value");
        let expanded = expand_env_vars("key: ${S3PUT_TEST_VAR}");
        assert_eq!(expanded, "key: test_value");
        std::env::remove_var("S3PUT_TEST_VAR");
    }

    #[test]
    #[serial]
    fn test_expand_env_vars_default_and_missing() {
        std::env::remove_var("S3PUT_MISSING_VAR");
        assert_eq!(
            expand_env_vars("a=${S3PUT_MISSING_VAR:-fallback} b=${S3PUT_MISSING_VAR}"),
            "a=fallback b=${S3PUT_MISSING_VAR}"
        );
    }

    #[test]
    fn test_parse_validates() {
        let yaml = r#"
s3:
  bucket: ""
  region: "us-east-1"
"#;
        assert!(matches!(
            ConfigLoader::parse(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
