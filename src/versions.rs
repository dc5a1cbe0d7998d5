//! Newer-version detection against the cached index
//!
//! Before a fresh snapshot is stored, its versions can be compared with what
//! the cache already holds to tell whether upstream published something new.

use crate::cache::ProfileStore;
use crate::cancel::CancelToken;
use crate::error::{ProfileCacheError, ProfileCacheResult};
use crate::profile::{HelmRepoKey, Profile};
use semver::Version;
use tracing::debug;

/// Parse chart versions the way Helm repositories write them
///
/// A leading `v` is dropped and missing minor or patch components count as
/// zero, so `v1` and `1.0` both read as `1.0.0`.
pub fn parse_versions(versions: &[String]) -> ProfileCacheResult<Vec<Version>> {
    versions
        .iter()
        .map(|raw| {
            Version::parse(&normalize(raw)).map_err(|e| ProfileCacheError::InvalidVersion {
                version: raw.clone(),
                source: e,
            })
        })
        .collect()
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);

    let mut padded = core.to_string();
    for _ in core.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    padded
}

/// Sort versions newest first
pub fn sort_versions(versions: &mut [Version]) {
    versions.sort_by(|a, b| b.cmp(a));
}

/// Return the newest incoming version if it beats everything already cached
///
/// Yields `None` when nothing is cached for the profile yet (a profile seen
/// for the first time is not "new") or when the incoming list is empty.
pub async fn check_for_new_version(
    store: &dyn ProfileStore,
    cancel: &CancelToken,
    repo: &HelmRepoKey,
    profile: &Profile,
) -> ProfileCacheResult<Option<Version>> {
    let stored = match store
        .list_available_versions_for_profile(cancel, repo, &profile.name)
        .await
    {
        Ok(stored) => stored,
        Err(ProfileCacheError::ProfileNotFound { .. }) => Vec::new(),
        Err(e) => return Err(e),
    };

    let mut incoming = parse_versions(&profile.available_versions)?;
    let mut stored = parse_versions(&stored)?;
    sort_versions(&mut incoming);
    sort_versions(&mut stored);

    let (Some(newest), Some(newest_stored)) = (incoming.first(), stored.first()) else {
        return Ok(None);
    };

    if newest > newest_stored {
        debug!(
            "Profile {} in {} moved from {} to {}",
            profile.name, repo, newest_stored, newest
        );
        return Ok(Some(newest.clone()));
    }

    Ok(None)
}
