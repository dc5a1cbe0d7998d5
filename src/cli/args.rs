//! CLI argument definitions using clap derive

use crate::profile::HelmRepoKey;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// profile-cache - inspect and maintain the Helm profile cache
///
/// Stores profile metadata and values files per HelmRepository under a
/// single lock-protected directory.
#[derive(Parser, Debug)]
#[command(name = "profile-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PROFILE_CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides cache.root)
    #[arg(long, global = true, env = "PROFILE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a repository snapshot from a manifest file
    Put(PutArgs),

    /// Remove everything cached for a repository
    Delete(RepoArgs),

    /// List cached profiles of a repository
    List(ListArgs),

    /// List available versions of a cached profile
    Versions(VersionsArgs),

    /// Print the cached values file of a profile version
    Values(ValuesArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// HelmRepository identifier
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// HelmRepository namespace
    pub namespace: String,

    /// HelmRepository name
    pub name: String,
}

impl RepoArgs {
    pub fn key(&self) -> HelmRepoKey {
        HelmRepoKey::new(&self.namespace, &self.name)
    }
}

/// Arguments for the put command
#[derive(Parser, Debug)]
pub struct PutArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Snapshot manifest (YAML) with profiles and values
    #[arg(short, long)]
    pub snapshot: PathBuf,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the versions command
#[derive(Parser, Debug)]
pub struct VersionsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Profile name
    pub profile: String,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the values command
#[derive(Parser, Debug)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Profile name
    pub profile: String,

    /// Profile version
    #[arg(value_name = "VERSION")]
    pub profile_version: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_values_command() {
        let cli = Cli::parse_from([
            "profile-cache",
            "--cache-dir",
            "/tmp/cache",
            "values",
            "flux-system",
            "weaveworks",
            "podinfo",
            "6.0.1",
        ]);

        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/cache")));
        match cli.command {
            Commands::Values(args) => {
                assert_eq!(args.repo.key(), HelmRepoKey::new("flux-system", "weaveworks"));
                assert_eq!(args.profile, "podinfo");
                assert_eq!(args.profile_version, "6.0.1");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn values_subcommand_keeps_version_flag() {
        let err = Cli::try_parse_from(["profile-cache", "values", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["profile-cache", "-vv", "list", "ns", "name"]);
        assert_eq!(cli.verbose, 2);
    }
}
