//! Advisory lock over the whole cache root
//!
//! A single exclusive advisory lock on `<root>/cache.lock` serialises every cache
//! operation, reads included. Locks belong to the open file description, so
//! two handles opened by the same process exclude each other as well.
//!
//! The lock is never re-entrant: an operation takes it exactly once.

use crate::cancel::CancelToken;
use crate::error::{ProfileCacheError, ProfileCacheResult};
use fs4::fs_std::FileExt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default overall deadline for taking the lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(60);

/// Default pause between attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Lock polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Give up with `LockTimeout` after this long
    pub timeout: Duration,

    /// Wait this long between attempts
    pub retry_interval: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOCK_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

/// Held cache lock, released when dropped
#[derive(Debug)]
pub struct CacheLock {
    file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Take the lock at `path`, polling until `options.timeout` elapses
    ///
    /// The lock file is created if missing, but its directory is not: a
    /// missing cache root fails with `LockUnavailable`.
    pub async fn acquire(
        path: &Path,
        options: &LockOptions,
        cancel: &CancelToken,
    ) -> ProfileCacheResult<Self> {
        cancel.check()?;
        let file = open_lock_file(path)
            .await
            .map_err(|e| ProfileCacheError::LockUnavailable {
                path: path.to_path_buf(),
                source: e,
            })?;

        let deadline = Instant::now() + options.timeout;
        let mut attempts = 0u32;

        loop {
            cancel.check()?;
            attempts += 1;

            let locked =
                try_lock_exclusive(&file).map_err(|e| ProfileCacheError::LockUnavailable {
                    path: path.to_path_buf(),
                    source: e,
                })?;

            if locked {
                debug!("Acquired {} after {} attempt(s)", path.display(), attempts);
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(ProfileCacheError::LockTimeout {
                    path: path.to_path_buf(),
                    timeout: options.timeout,
                });
            }

            let wait = options.retry_interval.min(deadline - now);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = cancel.cancelled() => return Err(ProfileCacheError::Cancelled),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock regardless.
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Unable to unlock file {}: {}", self.path.display(), e);
        } else {
            debug!("Released {}", self.path.display());
        }
    }
}

async fn open_lock_file(path: &Path) -> io::Result<File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).truncate(false).write(true);
    #[cfg(unix)]
    options.mode(0o700);

    let file = options.open(path).await?;
    Ok(file.into_std().await)
}

/// Non-blocking attempt; `Ok(false)` when another handle holds the lock
fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => Ok(true),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
