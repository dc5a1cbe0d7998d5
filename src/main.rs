//! profile-cache - Helm profile cache maintenance tool
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use profile_cache::cache::ProfileCache;
use profile_cache::cli::{commands, Cli, Commands};
use profile_cache::config::{Config, ConfigManager};
use profile_cache::error::ProfileCacheResult;
use profile_cache::CancelToken;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ProfileCacheResult<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::locate(cli.config.as_deref());
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    // Ctrl-C cancels whatever cache operation is in flight
    let cancel = CancelToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let root = cli
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache.resolved_root(ConfigManager::default_cache_root()));

    match cli.command {
        Commands::Put(args) => {
            let cache = open_cache(root, &config, true).await?;
            commands::put(args, &cache, &cancel).await
        }
        Commands::Delete(args) => {
            let cache = open_cache(root, &config, false).await?;
            commands::delete(args, &cache, &cancel).await
        }
        Commands::List(args) => {
            let cache = open_cache(root, &config, false).await?;
            commands::list(args, &cache, &cancel).await
        }
        Commands::Versions(args) => {
            let cache = open_cache(root, &config, false).await?;
            commands::versions(args, &cache, &cancel).await
        }
        Commands::Values(args) => {
            let cache = open_cache(root, &config, false).await?;
            commands::values(args, &cache, &cancel).await
        }
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}

/// Open the cache; only writers create a missing root
async fn open_cache(
    root: PathBuf,
    config: &Config,
    create: bool,
) -> ProfileCacheResult<ProfileCache> {
    let lock_options = config.cache.lock_options();
    debug!("Cache root: {}", root.display());

    if create {
        ProfileCache::with_lock_options(root, lock_options).await
    } else {
        Ok(ProfileCache::unchecked(root).lock_options(lock_options))
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("profile_cache=warn"),
        1 => EnvFilter::new("profile_cache=info"),
        _ => EnvFilter::new("profile_cache=debug"),
    };

    // Logs go to stderr so `values` output stays byte-exact
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
