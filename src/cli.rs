//! Command-line interface definitions.
//!
//! All arguments, subcommands and options via the clap derive API: global
//! options (verbosity, movies roots, catalog path) and one subcommand per
//! operation.
//!
//! # Example
//!
//! ```bash
//! # Resolve every movie directory against the catalog
//! reelsync check
//!
//! # Resolve interactively, opening a search page for unknowns
//! reelsync check -i -o
//!
//! # Push the watched list to the remote store
//! reelsync sync --server https://store.example.com --user alex --database watched
//!
//! # Seed the remote store with 20000 random catalog rows
//! reelsync sample --no-auth --server http://localhost:8080 --database watched
//!
//! # Build the local catalog mirror from a title dump
//! reelsync --catalog ~/.cache/reelsync/titles.db import title.basics.tsv
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Movie library identification and remote sync.
///
/// ReelSync maps local movie directories to canonical catalog entries and
/// reconciles the resulting records with a shared remote store.
#[derive(Debug, Parser)]
#[command(name = "reelsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// A directory to search for movies (repeatable; defaults to the config file)
    #[arg(short = 'm', long = "movies-dir", value_name = "PATH", global = true)]
    pub movies_dirs: Vec<PathBuf>,

    /// Path to the local catalog SQLite mirror
    #[arg(long, value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that every movie directory resolves to a catalog entry
    Check(CheckArgs),
    /// Sync the watched movie list to the remote store
    Sync(SyncArgs),
    /// Seed the remote store with a random sample of the catalog
    Sample(SampleArgs),
    /// Build the local catalog mirror from a TSV title dump
    Import(ImportArgs),
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Prompt for help when a movie cannot be resolved
    #[arg(short, long)]
    pub interactive: bool,

    /// Open a web search for unresolved movies (only with --interactive)
    #[arg(short = 'o', long = "auto-open-web", requires = "interactive")]
    pub auto_open_web: bool,
}

/// Remote store connection flags, shared by sync and sample.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Base URL of the remote store (defaults to the config file)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Username for the remote store
    #[arg(short, long, value_name = "NAME")]
    pub user: Option<String>,

    /// Database name on the remote store
    #[arg(short, long, value_name = "NAME")]
    pub database: Option<String>,

    /// Force prompting for the password instead of taking it from the keyring
    #[arg(short = 'P', long)]
    pub prompt_password: bool,

    /// Connect without credentials
    #[arg(long, conflicts_with_all = ["user", "prompt_password"])]
    pub no_auth: bool,

    /// Apply the batch to an in-process store and report what would change
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the sync subcommand.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Remote store connection
    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Arguments for the sample subcommand.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// How many random catalog rows to seed
    #[arg(short, long, value_name = "N", default_value = "20000")]
    pub number: usize,

    /// Remote store connection
    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Arguments for the import subcommand.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Tab-separated title dump to import (`\N` for null fields)
    #[arg(value_name = "TSV")]
    pub dump: PathBuf,
}
