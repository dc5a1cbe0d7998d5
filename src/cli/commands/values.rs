//! Values command - print a cached values file

use crate::cache::{ProfileCache, ProfileStore};
use crate::cancel::CancelToken;
use crate::cli::args::ValuesArgs;
use crate::error::{ProfileCacheError, ProfileCacheResult};
use tokio::io::AsyncWriteExt;

/// Execute the values command
pub async fn execute(
    args: ValuesArgs,
    cache: &ProfileCache,
    cancel: &CancelToken,
) -> ProfileCacheResult<()> {
    let repo = args.repo.key();
    let values = cache
        .get_profile_values(cancel, &repo, &args.profile, &args.profile_version)
        .await?;

    // Raw bytes, untouched
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&values)
        .await
        .map_err(|e| ProfileCacheError::io("writing values to stdout", e))?;
    stdout
        .flush()
        .await
        .map_err(|e| ProfileCacheError::io("flushing stdout", e))?;

    Ok(())
}
