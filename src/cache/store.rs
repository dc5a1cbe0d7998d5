//! Profile cache engine
//!
//! Every operation takes the cache lock exactly once, does its filesystem
//! work, and releases the lock on every exit path by dropping the guard.
//! Nothing is cached in memory: each query re-reads the files.

use super::codec;
use super::lock::{CacheLock, LockOptions};
use super::paths::CacheLayout;
use super::VALUES_FILENAME;
use crate::cancel::CancelToken;
use crate::error::{ProfileCacheError, ProfileCacheResult};
use crate::profile::{Data, HelmRepoKey, Profile};
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Profile cache interface
///
/// Implemented by [`ProfileCache`]; consumers such as the version checker
/// take a `&dyn ProfileStore` so they can be exercised against other stores.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Store a snapshot for a repository
    async fn put(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        data: &Data,
    ) -> ProfileCacheResult<()>;

    /// Remove everything stored for a repository
    async fn delete(&self, cancel: &CancelToken, repo: &HelmRepoKey) -> ProfileCacheResult<()>;

    /// Profiles from the latest snapshot, in snapshot order
    async fn list_profiles(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
    ) -> ProfileCacheResult<Vec<Profile>>;

    /// Available versions of a profile, read from the profiles index
    ///
    /// Returns an empty list when nothing was stored for the repository yet.
    async fn list_available_versions_for_profile(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        profile_name: &str,
    ) -> ProfileCacheResult<Vec<String>>;

    /// Raw values file of one profile version
    async fn get_profile_values(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        profile_name: &str,
        profile_version: &str,
    ) -> ProfileCacheResult<Vec<u8>>;
}

/// On-disk profile cache rooted at a single directory
#[derive(Debug, Clone)]
pub struct ProfileCache {
    layout: CacheLayout,
    lock_options: LockOptions,
}

impl ProfileCache {
    /// Create the cache root (owner-only) if needed and open the cache
    pub async fn new(root: impl Into<PathBuf>) -> ProfileCacheResult<Self> {
        Self::with_lock_options(root, LockOptions::default()).await
    }

    /// Like [`ProfileCache::new`] with custom lock polling
    pub async fn with_lock_options(
        root: impl Into<PathBuf>,
        lock_options: LockOptions,
    ) -> ProfileCacheResult<Self> {
        let root = root.into();
        create_private_dir(&root).await.map_err(|e| {
            ProfileCacheError::storage(format!("creating cache root {}", root.display()), e)
        })?;

        // Tighten a pre-existing root as well
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&root, perms).map_err(|e| {
                ProfileCacheError::storage(
                    format!("setting permissions on cache root {}", root.display()),
                    e,
                )
            })?;
        }

        debug!("Profile cache ready at {}", root.display());
        Ok(Self::unchecked(root).lock_options(lock_options))
    }

    /// Attach to `root` without creating it
    ///
    /// Operations fail with `LockUnavailable` until the directory exists.
    pub fn unchecked(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: CacheLayout::new(root),
            lock_options: LockOptions::default(),
        }
    }

    /// Replace the lock polling settings
    pub fn lock_options(mut self, lock_options: LockOptions) -> Self {
        self.lock_options = lock_options;
        self
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    async fn lock(&self, cancel: &CancelToken) -> ProfileCacheResult<CacheLock> {
        CacheLock::acquire(&self.layout.lock_file(), &self.lock_options, cancel).await
    }

    /// Read and decode an index. Callers must hold the lock.
    async fn read_index(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        path: &Path,
    ) -> ProfileCacheResult<Vec<Profile>> {
        cancel.check()?;
        let content = match fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProfileCacheError::NotFound {
                    path: path.to_path_buf(),
                    repo: repo.clone(),
                })
            }
            Err(e) => {
                return Err(ProfileCacheError::storage(
                    format!("reading profiles index {}", path.display()),
                    e,
                ))
            }
        };

        codec::decode_profiles(&content).map_err(|e| ProfileCacheError::CorruptIndex {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[async_trait]
impl ProfileStore for ProfileCache {
    async fn put(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        data: &Data,
    ) -> ProfileCacheResult<()> {
        info!("Starting put for helm repository {}", repo);
        data.validate()?;

        // Resolve every path up front so a bad identifier never leaves a
        // half-written repository behind.
        let repo_dir = self.layout.repo_dir(repo)?;
        let index_path = self.layout.profiles_index(repo)?;
        let mut values_files = Vec::with_capacity(data.values_count());
        for (profile_name, versions) in &data.values {
            for (version, values) in versions {
                let dir = self.layout.version_dir(repo, profile_name, version)?;
                values_files.push((dir, values));
            }
        }

        let index = codec::encode_profiles(&data.profiles).map_err(|e| {
            ProfileCacheError::storage("encoding profiles index", io::Error::other(e))
        })?;

        let _lock = self.lock(cancel).await?;

        cancel.check()?;
        create_private_dir(&repo_dir).await.map_err(|e| {
            ProfileCacheError::storage(format!("creating {}", repo_dir.display()), e)
        })?;

        write_replace(cancel, &index_path, index.as_bytes()).await?;
        debug!("Wrote {}", index_path.display());

        for (dir, values) in values_files {
            cancel.check()?;
            create_private_dir(&dir).await.map_err(|e| {
                ProfileCacheError::storage(format!("creating {}", dir.display()), e)
            })?;

            let path = dir.join(VALUES_FILENAME);
            cancel.check()?;
            write_private_file(&path, values)
                .await
                .map_err(|e| ProfileCacheError::storage(format!("writing {}", path.display()), e))?;
            debug!("Wrote {}", path.display());
        }

        info!(
            "Finished put for helm repository {} ({} profile(s), {} values file(s))",
            repo,
            data.profiles.len(),
            data.values_count()
        );
        Ok(())
    }

    async fn delete(&self, cancel: &CancelToken, repo: &HelmRepoKey) -> ProfileCacheResult<()> {
        let repo_dir = self.layout.repo_dir(repo)?;
        let _lock = self.lock(cancel).await?;

        cancel.check()?;
        match fs::remove_dir_all(&repo_dir).await {
            Ok(()) => {
                info!("Deleted cache for helm repository {}", repo);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Nothing cached for helm repository {}", repo);
                Ok(())
            }
            Err(e) => Err(ProfileCacheError::storage(
                format!("removing {}", repo_dir.display()),
                e,
            )),
        }
    }

    async fn list_profiles(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
    ) -> ProfileCacheResult<Vec<Profile>> {
        debug!("Listing cached profiles for helm repository {}", repo);
        let path = self.layout.profiles_index(repo)?;
        let _lock = self.lock(cancel).await?;

        self.read_index(cancel, repo, &path).await
    }

    async fn list_available_versions_for_profile(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        profile_name: &str,
    ) -> ProfileCacheResult<Vec<String>> {
        // Version directories only exist for versions that had values, so
        // the index is the source of truth.
        let path = self.layout.profiles_index(repo)?;
        let _lock = self.lock(cancel).await?;

        let profiles = match self.read_index(cancel, repo, &path).await {
            Ok(profiles) => profiles,
            Err(ProfileCacheError::NotFound { .. }) => {
                debug!("No cached index for helm repository {}", repo);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        profiles
            .into_iter()
            .find(|p| p.name == profile_name)
            .map(|p| p.available_versions)
            .ok_or_else(|| ProfileCacheError::ProfileNotFound {
                profile: profile_name.to_string(),
                repo: repo.clone(),
            })
    }

    async fn get_profile_values(
        &self,
        cancel: &CancelToken,
        repo: &HelmRepoKey,
        profile_name: &str,
        profile_version: &str,
    ) -> ProfileCacheResult<Vec<u8>> {
        debug!(
            "Reading cached values for {} {} from helm repository {}",
            profile_name, profile_version, repo
        );
        let path = self
            .layout
            .values_file(repo, profile_name, profile_version)?;
        let _lock = self.lock(cancel).await?;

        cancel.check()?;
        match fs::read(&path).await {
            Ok(values) => Ok(values),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ProfileCacheError::NotFound {
                path,
                repo: repo.clone(),
            }),
            Err(e) => Err(ProfileCacheError::storage(
                format!("reading {}", path.display()),
                e,
            )),
        }
    }
}

async fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(path).await
}

async fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o700);

    let mut file = options.open(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    Ok(())
}

/// Write `content` beside `path`, then rename it into place
async fn write_replace(
    cancel: &CancelToken,
    path: &Path,
    content: &[u8],
) -> ProfileCacheResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    cancel.check()?;
    write_private_file(&tmp, content)
        .await
        .map_err(|e| ProfileCacheError::storage(format!("writing {}", tmp.display()), e))?;

    if let Err(e) = fs::rename(&tmp, path).await {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            warn!("Failed to remove {}: {}", tmp.display(), cleanup);
        }
        return Err(ProfileCacheError::storage(
            format!("replacing {}", path.display()),
            e,
        ));
    }

    Ok(())
}
