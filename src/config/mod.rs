//! Where the CLI finds its settings
//!
//! The settings file is optional. Without one the cache runs on built-in
//! defaults; a file that exists but does not parse is an error.

pub mod schema;

pub use schema::Config;

use crate::error::{ProfileCacheError, ProfileCacheResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const APP_DIR: &str = "profile-cache";

/// Locates, reads and writes the settings file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use `explicit` when given, otherwise `<config dir>/profile-cache/config.toml`
    pub fn locate(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("config.toml"),
        };
        Self { path }
    }

    /// Cache root used when neither `--cache-dir` nor `cache.root` is set
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings, or defaults when there is no file
    pub async fn load(&self) -> ProfileCacheResult<Config> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(ProfileCacheError::io(
                    format!("reading config from {}", self.path.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content).map_err(|e| ProfileCacheError::ConfigInvalid {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `config`, creating the parent directory if needed
    pub async fn write(&self, config: &Config) -> ProfileCacheResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ProfileCacheError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content).await.map_err(|e| {
            ProfileCacheError::io(format!("writing config to {}", self.path.display()), e)
        })?;

        info!("Wrote config to {}", self.path.display());
        Ok(())
    }
}
