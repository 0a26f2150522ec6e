//! Client configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! an optional JSON file, and the `PDF_BATCH_API_URL` environment variable.
//! The CLI applies its `--api-url` flag on top.

use crate::error::{BatchError, BatchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "PDF_BATCH_API_URL";

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Generation of large batches can take minutes server-side.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads the file (if any) and applies the environment override.
    pub fn load(path: Option<&Path>) -> BatchResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> BatchResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| BatchError::Serialization {
            context: format!("config file '{}'", path.display()),
            source,
        })
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Replaces the backend URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Normalizes the URL and rejects unusable values.
    pub fn validated(mut self) -> BatchResult<Self> {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        if self.api_url.is_empty() {
            return Err(BatchError::invalid_input("api_url", "must not be empty"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(BatchError::invalid_input(
                "api_url",
                format!("'{}' is not an http(s) URL", self.api_url),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(BatchError::invalid_input(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_env_override() {
        let config = ClientConfig::default().with_overrides(|key| {
            (key == API_URL_ENV).then(|| "https://api.example.com/".to_string())
        });
        let config = config.validated().unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(ClientConfig::default()
            .with_api_url("ftp://host")
            .validated()
            .is_err());
        assert!(ClientConfig::default().with_api_url("  ").validated().is_err());
    }
}
