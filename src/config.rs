//! Client configuration
//!
//! Loads settings from owockibot.toml with support for:
//! - API base URL
//! - Request timeout
//! - Extra headers merged into every request
//!
//! Environment variables take precedence over the file.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("../owockibot.toml");

pub const DEFAULT_BASE_URL: &str = "https://bounty.owockibot.xyz";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "OWOCKIBOT_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "OWOCKIBOT_TIMEOUT_MS";

/// Settings shared by the blocking and async clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Load from ./owockibot.toml (or the embedded defaults), then apply env overrides
    pub fn load() -> Result<Self> {
        Self::load_from("owockibot.toml")
    }

    /// Load from a specific path, falling back to the embedded defaults if it does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_lookup(path.as_ref(), |key| std::env::var(key).ok())
    }

    fn load_with_lookup(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("failed to read {}: {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            Self::from_toml(DEFAULT_CONFIG)?
        };

        config.with_env_overrides(lookup)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS).filter(|v| !v.is_empty()) {
            self.timeout_ms = raw.parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got {:?}", ENV_TIMEOUT_MS, raw))
            })?;
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without trailing slashes
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // The embedded default config always parses; the fallback mirrors it.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            headers: BTreeMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_from_toml_with_headers() {
        let config = ClientConfig::from_toml(
            r#"
            base_url = "http://localhost:8080/"
            timeout_ms = 500

            [headers]
            X-Agent = "tester"
            "#,
        )
        .unwrap();
        assert_eq!(config.normalized_base_url(), "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.headers.get("X-Agent").map(String::as_str), Some("tester"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ClientConfig::from_toml("base_url = 42"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let config = ClientConfig::default()
            .with_env_overrides(|key| match key {
                ENV_BASE_URL => Some("http://staging".to_string()),
                ENV_TIMEOUT_MS => Some("1500".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "http://staging");
        assert_eq!(config.timeout_ms, 1500);
    }

    #[test]
    fn test_bad_timeout_env() {
        let result = ClientConfig::default().with_env_overrides(|key| {
            (key == ENV_TIMEOUT_MS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = Path::new("/nonexistent/owockibot.toml");
        let config = ClientConfig::load_with_lookup(path, |_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_timeout(Duration::from_millis(250))
            .with_header("Authorization", "Bearer x");
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.headers.len(), 1);
    }
}
