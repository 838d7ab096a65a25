// Command-line arguments and dispatch.
// Maps each subcommand onto its `App::run_*` implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::App;
use crate::error::Result;

/// Discover GitHub repositories using flox and tally their stars
#[derive(Parser, Debug)]
#[command(name = "gh-flox")]
#[command(about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bypass the on-disk cache for this run
    #[arg(long, global = true, env = "GH_FLOX_NO_CACHE")]
    pub no_cache: bool,
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListArgs {
    /// Include star counts and the repository list
    #[arg(short, long)]
    pub verbose: bool,

    /// Keep repositories owned by the flox organization or its members
    #[arg(short, long)]
    pub full: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Repositories containing a .flox/env/manifest.toml
    Repos(ListArgs),
    /// Repositories whose README mentions `flox install`
    Readmes(ListArgs),
    /// Star count of flox/flox
    Stars,
    /// Sum of stars across all flox-related repositories
    Floxindex {
        #[arg(short, long)]
        full: bool,
    },
    /// Dump both searches as JSON
    Export {
        #[arg(short, long)]
        full: bool,
    },
    /// Remove every cached entry
    Clearcache,
    /// Download manifest.toml from each discovered repository
    DownloadManifests {
        /// Output directory
        #[arg(long, default_value = "manifests")]
        dir: PathBuf,
    },
    /// Print version and build information
    Version,
}

impl Commands {
    /// Whether this command needs a GitHub token.
    pub fn needs_api(&self) -> bool {
        !matches!(self, Commands::Clearcache | Commands::Version)
    }

    pub async fn execute<W: Write>(&self, app: &mut App, out: &mut W) -> Result<()> {
        match self {
            Commands::Repos(args) => app.run_repos(out, args.full, args.verbose).await,
            Commands::Readmes(args) => app.run_readmes(out, args.full, args.verbose).await,
            Commands::Stars => app.run_stars(out).await,
            Commands::Floxindex { full } => app.run_floxindex(out, *full).await,
            Commands::Export { full } => app.run_export(out, *full).await,
            Commands::Clearcache => app.run_clear_cache(out),
            Commands::DownloadManifests { dir } => app.run_download_manifests(out, dir).await,
            Commands::Version => app.run_version(out),
        }
    }
}
