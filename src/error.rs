//! Error types for the profile cache
//!
//! All modules use `ProfileCacheResult<T>` as their return type.

use crate::profile::HelmRepoKey;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for profile cache operations
pub type ProfileCacheResult<T> = Result<T, ProfileCacheError>;

/// All errors that can occur in the profile cache
#[derive(Error, Debug)]
pub enum ProfileCacheError {
    // Query errors
    #[error("{} not found for helm repository {repo}", .path.display())]
    NotFound { path: PathBuf, repo: HelmRepoKey },

    #[error("profile with name {profile} not found in cached profiles for helm repository {repo}")]
    ProfileNotFound { profile: String, repo: HelmRepoKey },

    #[error("failed to decode profiles index {}: {source}", .path.display())]
    CorruptIndex {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    // Storage errors
    #[error("storage failure while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Lock errors
    #[error("unable to open lock file {}: {source}", .path.display())]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} waiting for lock file {}", .path.display())]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("operation cancelled")]
    Cancelled,

    // Programming errors
    #[error("invalid identifier {segment:?}: {reason}")]
    InvalidIdentifier {
        segment: String,
        reason: &'static str,
    },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid semantic version {version:?}: {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors outside the cache root
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl ProfileCacheError {
    /// Create a storage failure for an operation on the cache root
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    ///
    /// Only lock contention is transient. Everything else is either a
    /// definite answer or needs an operator.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }

    /// Check if the error reports absent data rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ProfileNotFound { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::LockUnavailable { .. } => {
                Some("The cache root may not exist. Check --cache-dir or cache.root in the config")
            }
            Self::LockTimeout { .. } => Some(
                "Another process holds the cache lock. Retry, or raise cache.lock_timeout_secs",
            ),
            Self::CorruptIndex { .. } => {
                Some("Run `profile-cache delete` for the repository and put a fresh snapshot")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProfileCacheError::NotFound {
            path: PathBuf::from("/cache/ns/name/profiles.yaml"),
            repo: HelmRepoKey::new("ns", "name"),
        };
        let message = err.to_string();
        assert!(message.contains("/cache/ns/name/profiles.yaml"));
        assert!(message.contains("ns/name"));
    }

    #[test]
    fn error_hint() {
        let err = ProfileCacheError::LockTimeout {
            path: PathBuf::from("cache.lock"),
            timeout: Duration::from_secs(1),
        };
        assert!(err.hint().unwrap().contains("lock_timeout_secs"));
        assert_eq!(ProfileCacheError::Cancelled.hint(), None);
    }

    #[test]
    fn error_retryable() {
        let timeout = ProfileCacheError::LockTimeout {
            path: PathBuf::from("cache.lock"),
            timeout: Duration::from_secs(1),
        };
        assert!(timeout.is_retryable());
        assert!(!ProfileCacheError::Cancelled.is_retryable());
    }

    #[test]
    fn error_not_found() {
        let err = ProfileCacheError::ProfileNotFound {
            profile: "podinfo".to_string(),
            repo: HelmRepoKey::new("ns", "name"),
        };
        assert!(err.is_not_found());
        assert!(!ProfileCacheError::Cancelled.is_not_found());
    }
}
