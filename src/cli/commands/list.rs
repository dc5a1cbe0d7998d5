//! List command - show cached profiles of a repository

use crate::cache::{ProfileCache, ProfileStore};
use crate::cancel::CancelToken;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::ProfileCacheResult;
use crate::profile::{HelmRepoKey, Profile};
use console::style;

/// Execute the list command
pub async fn execute(
    args: ListArgs,
    cache: &ProfileCache,
    cancel: &CancelToken,
) -> ProfileCacheResult<()> {
    let repo = args.repo.key();
    let profiles = cache.list_profiles(cancel, &repo).await?;

    match args.format {
        OutputFormat::Table => print_table(&repo, &profiles),
        OutputFormat::Json => print_json(&profiles)?,
        OutputFormat::Plain => print_plain(&profiles),
    }

    Ok(())
}

fn print_table(repo: &HelmRepoKey, profiles: &[Profile]) {
    if profiles.is_empty() {
        println!("No profiles cached for {}", repo);
        return;
    }

    println!(
        "{:<30} {:<12} {:<10} {:<40}",
        style("NAME").bold(),
        style("LATEST").bold(),
        style("VERSIONS").bold(),
        style("DESCRIPTION").bold()
    );
    println!("{}", "-".repeat(95));

    for profile in profiles {
        // Upstream lists newest last
        let latest = profile
            .available_versions
            .last()
            .map(String::as_str)
            .unwrap_or("-");

        println!(
            "{:<30} {:<12} {:<10} {:<40}",
            profile.name,
            latest,
            profile.available_versions.len(),
            truncate(&profile.description, 40)
        );
    }

    println!();
    println!("{} profile(s) in {}", profiles.len(), repo);
}

fn print_json(profiles: &[Profile]) -> ProfileCacheResult<()> {
    let json = serde_json::to_string_pretty(profiles)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(profiles: &[Profile]) {
    for profile in profiles {
        println!("{}", profile.name);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
