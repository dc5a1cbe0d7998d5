//! Cancellation handle passed to every cache operation

use crate::error::{ProfileCacheError, ProfileCacheResult};
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable cancellation handle
///
/// Cancelling any clone cancels them all. Operations observe it between lock
/// retries and before each filesystem call, never in the middle of one.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as any clone of the token, so this only
        // returns once the flag flips.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Fail with `Cancelled` if cancellation was requested
    pub fn check(&self) -> ProfileCacheResult<()> {
        if self.is_cancelled() {
            return Err(ProfileCacheError::Cancelled);
        }
        Ok(())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
