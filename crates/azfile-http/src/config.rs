//! Client configuration.
//!
//! Provides [`FileClientConfig`], the values the standard header update step
//! stamps on every outgoing request.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default `x-ms-version` sent with every request.
pub const DEFAULT_API_VERSION: &str = "2015-04-05";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("azfile/", env!("CARGO_PKG_VERSION"));

/// File client configuration.
///
/// # Examples
///
/// ```
/// use azfile_http::config::FileClientConfig;
///
/// let config = FileClientConfig::default();
/// assert_eq!(config.api_version, "2015-04-05");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct FileClientConfig {
    /// Service version sent as `x-ms-version`.
    #[builder(default = String::from(DEFAULT_API_VERSION))]
    pub api_version: String,

    /// Value of the `User-Agent` header.
    #[builder(default = String::from(DEFAULT_USER_AGENT))]
    pub user_agent: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for FileClientConfig {
    fn default() -> Self {
        Self {
            api_version: String::from(DEFAULT_API_VERSION),
            user_agent: String::from(DEFAULT_USER_AGENT),
            log_level: String::from("info"),
        }
    }
}

impl FileClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AZFILE_API_VERSION` | `2015-04-05` |
    /// | `AZFILE_USER_AGENT` | `azfile/<crate version>` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("AZFILE_API_VERSION") {
            config.api_version = v;
        }
        if let Ok(v) = std::env::var("AZFILE_USER_AGENT") {
            config.user_agent = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = FileClientConfig::default();
        assert_eq!(config.api_version, "2015-04-05");
        assert!(config.user_agent.starts_with("azfile/"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_load_from_env() {
        let config = FileClientConfig::from_env();
        assert!(!config.api_version.is_empty());
        assert!(!config.user_agent.is_empty());
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = FileClientConfig::builder()
            .api_version("2019-02-02".into())
            .log_level("debug".into())
            .build();

        assert_eq!(config.api_version, "2019-02-02");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let json = serde_json::to_string(&FileClientConfig::default()).expect("test serialization");
        assert!(json.contains("apiVersion"));
        assert!(json.contains("userAgent"));
    }
}
