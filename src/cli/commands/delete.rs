//! Delete command - drop a repository from the cache

use crate::cache::{ProfileCache, ProfileStore};
use crate::cancel::CancelToken;
use crate::cli::args::RepoArgs;
use crate::error::ProfileCacheResult;
use console::style;

/// Execute the delete command
pub async fn execute(
    args: RepoArgs,
    cache: &ProfileCache,
    cancel: &CancelToken,
) -> ProfileCacheResult<()> {
    let repo = args.key();
    cache.delete(cancel, &repo).await?;

    println!(
        "{} Removed cached data for {}",
        style("[OK]").green(),
        style(&repo).cyan()
    );
    Ok(())
}
