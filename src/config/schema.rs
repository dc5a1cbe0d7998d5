//! Configuration schema
//!
//! Configuration is stored at `~/.config/profile-cache/config.toml`

use crate::cache::LockOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Profile cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory (defaults to the user cache dir)
    pub root: Option<PathBuf>,

    /// Seconds to wait for the cache lock
    pub lock_timeout_secs: u64,

    /// Milliseconds between lock attempts
    pub lock_retry_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let defaults = LockOptions::default();
        Self {
            root: None,
            lock_timeout_secs: defaults.timeout.as_secs(),
            lock_retry_interval_ms: defaults.retry_interval.as_millis() as u64,
        }
    }
}

impl CacheConfig {
    /// Lock polling settings for the cache
    pub fn lock_options(&self) -> LockOptions {
        LockOptions {
            timeout: Duration::from_secs(self.lock_timeout_secs),
            retry_interval: Duration::from_millis(self.lock_retry_interval_ms.max(1)),
        }
    }

    /// Configured root, or `fallback` when unset
    pub fn resolved_root(&self, fallback: PathBuf) -> PathBuf {
        self.root.clone().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("lock_timeout_secs = 60"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.general.log_format, "text");
        assert_eq!(config.cache.lock_options(), LockOptions::default());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [cache]
            root = "/srv/profiles"
            lock_timeout_secs = 5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.cache.resolved_root(PathBuf::from("/fallback")),
            PathBuf::from("/srv/profiles")
        );
        assert_eq!(config.cache.lock_options().timeout, Duration::from_secs(5));
        assert_eq!(
            config.cache.lock_options().retry_interval,
            Duration::from_millis(250)
        ); // default preserved
    }

    #[test]
    fn root_falls_back() {
        let config = CacheConfig::default();
        assert_eq!(
            config.resolved_root(PathBuf::from("/fallback")),
            PathBuf::from("/fallback")
        );
    }
}
