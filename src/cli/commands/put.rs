//! Put command - store a repository snapshot

use crate::cache::{ProfileCache, ProfileStore};
use crate::cancel::CancelToken;
use crate::cli::args::PutArgs;
use crate::error::ProfileCacheResult;
use crate::snapshot::SnapshotManifest;
use crate::versions::check_for_new_version;
use console::style;
use tracing::{debug, warn};

/// Execute the put command
pub async fn execute(
    args: PutArgs,
    cache: &ProfileCache,
    cancel: &CancelToken,
) -> ProfileCacheResult<()> {
    let repo = args.repo.key();
    let data = SnapshotManifest::load(&args.snapshot).await?.into_data();
    debug!(
        "Loaded snapshot {} with {} profile(s)",
        args.snapshot.display(),
        data.profiles.len()
    );

    // Compare against what is cached before it gets overwritten
    for profile in &data.profiles {
        match check_for_new_version(cache, cancel, &repo, profile).await {
            Ok(Some(version)) => println!(
                "{} New version available for profile {}: {}",
                style("+").green(),
                style(&profile.name).cyan(),
                version
            ),
            Ok(None) => {}
            Err(e) => warn!("Checking for new versions of {} failed: {}", profile.name, e),
        }
    }

    cache.put(cancel, &repo, &data).await?;

    println!(
        "{} Cached {} profile(s) and {} values file(s) for {}",
        style("[OK]").green(),
        data.profiles.len(),
        data.values_count(),
        style(&repo).cyan()
    );
    Ok(())
}
