//! Cache layout: logical identifiers to filesystem paths
//!
//! ```text
//! <root>/
//!   cache.lock
//!   <namespace>/<name>/
//!     profiles.yaml
//!     <profile>/<version>/values.yaml
//! ```
//!
//! Identifiers are used verbatim. Anything that would escape or alias its
//! directory is rejected instead of being cleaned up.

use super::{LOCK_FILENAME, PROFILES_FILENAME, VALUES_FILENAME};
use crate::error::{ProfileCacheError, ProfileCacheResult};
use crate::profile::HelmRepoKey;
use std::path::{Path, PathBuf};

/// Maps repository, profile and version identifiers under a cache root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the advisory lock file
    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILENAME)
    }

    /// Directory holding everything cached for one repository
    pub fn repo_dir(&self, repo: &HelmRepoKey) -> ProfileCacheResult<PathBuf> {
        Ok(self
            .root
            .join(segment(&repo.namespace)?)
            .join(segment(&repo.name)?))
    }

    /// Path of the repository's profiles index
    pub fn profiles_index(&self, repo: &HelmRepoKey) -> ProfileCacheResult<PathBuf> {
        Ok(self.repo_dir(repo)?.join(PROFILES_FILENAME))
    }

    /// Directory holding the values file for one profile version
    pub fn version_dir(
        &self,
        repo: &HelmRepoKey,
        profile: &str,
        version: &str,
    ) -> ProfileCacheResult<PathBuf> {
        Ok(self
            .repo_dir(repo)?
            .join(segment(profile)?)
            .join(segment(version)?))
    }

    /// Path of the values file for one profile version
    pub fn values_file(
        &self,
        repo: &HelmRepoKey,
        profile: &str,
        version: &str,
    ) -> ProfileCacheResult<PathBuf> {
        Ok(self.version_dir(repo, profile, version)?.join(VALUES_FILENAME))
    }
}

/// Accept `value` only if it is a single, plain path component
fn segment(value: &str) -> ProfileCacheResult<&str> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value == "." || value == ".." {
        Some("must not be a relative directory reference")
    } else if value.chars().any(std::path::is_separator) {
        Some("must not contain a path separator")
    } else if value.contains('\0') {
        Some("must not contain a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ProfileCacheError::InvalidIdentifier {
            segment: value.to_string(),
            reason,
        }),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CacheLayout {
        CacheLayout::new("/var/cache/profiles")
    }

    #[test]
    fn lock_file_at_root() {
        assert_eq!(
            layout().lock_file(),
            PathBuf::from("/var/cache/profiles/cache.lock")
        );
    }

    #[test]
    fn index_and_values_paths() {
        let repo = HelmRepoKey::new("flux-system", "weaveworks");

        assert_eq!(
            layout().profiles_index(&repo).unwrap(),
            PathBuf::from("/var/cache/profiles/flux-system/weaveworks/profiles.yaml")
        );
        assert_eq!(
            layout().values_file(&repo, "podinfo", "6.0.1").unwrap(),
            PathBuf::from("/var/cache/profiles/flux-system/weaveworks/podinfo/6.0.1/values.yaml")
        );
    }

    #[test]
    fn rejects_traversal() {
        let repo = HelmRepoKey::new("..", "weaveworks");
        let err = layout().repo_dir(&repo).unwrap_err();
        assert!(matches!(err, ProfileCacheError::InvalidIdentifier { .. }));

        let repo = HelmRepoKey::new("ns", "name");
        assert!(layout().values_file(&repo, ".", "1.0.0").is_err());
    }

    #[test]
    fn rejects_separators_and_empty() {
        let repo = HelmRepoKey::new("ns", "name");

        let err = layout().values_file(&repo, "podinfo", "../../etc").unwrap_err();
        assert!(err.to_string().contains("path separator"));

        let err = layout().repo_dir(&HelmRepoKey::new("", "name")).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn allows_dots_inside_names() {
        let repo = HelmRepoKey::new("ns", "charts.example.com");
        assert!(layout().values_file(&repo, "app..v2", "1.0.0-rc.1").is_ok());
    }
}
