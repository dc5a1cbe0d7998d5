//! Versions command - list available versions of a profile

use crate::cache::{ProfileCache, ProfileStore};
use crate::cancel::CancelToken;
use crate::cli::args::{OutputFormat, VersionsArgs};
use crate::error::ProfileCacheResult;

/// Execute the versions command
pub async fn execute(
    args: VersionsArgs,
    cache: &ProfileCache,
    cancel: &CancelToken,
) -> ProfileCacheResult<()> {
    let repo = args.repo.key();
    let versions = cache
        .list_available_versions_for_profile(cancel, &repo, &args.profile)
        .await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&versions)?),
        OutputFormat::Table | OutputFormat::Plain => {
            for version in &versions {
                println!("{}", version);
            }
        }
    }

    Ok(())
}
