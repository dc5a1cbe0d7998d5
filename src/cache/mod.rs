//! On-disk profile cache
//!
//! Stores one snapshot per HelmRepository: a `profiles.yaml` index plus one
//! `values.yaml` per profile version that had values upstream.
//!
//! # Consistency Model
//!
//! - One exclusive advisory lock (`cache.lock`) guards the whole root
//! - Reads take the same lock as writes, so a reader never sees a put in progress
//! - `put` overwrites the index but never prunes values of dropped versions
//! - `delete` removes a single repository subtree
//!
//! | Query | Source of truth | Nothing stored |
//! |-------|-----------------|----------------|
//! | `list_profiles` | `profiles.yaml` | `NotFound` |
//! | `list_available_versions_for_profile` | `profiles.yaml` | empty list |
//! | `get_profile_values` | `<profile>/<version>/values.yaml` | `NotFound` |

pub mod codec;
pub mod lock;
pub mod paths;
pub mod store;

pub use lock::{CacheLock, LockOptions};
pub use paths::CacheLayout;
pub use store::{ProfileCache, ProfileStore};

/// Lock file at the cache root
pub const LOCK_FILENAME: &str = "cache.lock";

/// Profiles index inside each repository directory
pub const PROFILES_FILENAME: &str = "profiles.yaml";

/// Values file inside each version directory
pub const VALUES_FILENAME: &str = "values.yaml";

/// File names the cache writes itself; never valid as profile names or versions
pub const RESERVED_NAMES: [&str; 3] = [LOCK_FILENAME, PROFILES_FILENAME, VALUES_FILENAME];
