//! profile-cache - on-disk cache of Helm profiles
//!
//! Keeps the profiles index and versioned values files of each scanned
//! HelmRepository under one directory, guarded by a single advisory lock.

pub mod cache;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod profile;
pub mod snapshot;
pub mod versions;

pub use cache::{ProfileCache, ProfileStore};
pub use cancel::CancelToken;
pub use error::{ProfileCacheError, ProfileCacheResult};
pub use profile::{Data, HelmRepoKey, Maintainer, Profile, ValueMap};
