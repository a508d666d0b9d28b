//! Command flows behind the CLI.
//!
//! Each subcommand maps to one function here. Per-item resolution failures
//! (unknown or ambiguous titles, unparseable directory names) are logged and
//! counted as skipped while the batch continues; infrastructure failures
//! (storage, cache divergence, remote connectivity) abort the run.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::cache::SidecarCache;
use crate::catalog::{CatalogStore, SqliteCatalog};
use crate::cli::{CheckArgs, Cli, Commands, ImportArgs, RemoteArgs, SampleArgs, SyncArgs};
use crate::config::{Config, RemoteConfig};
use crate::credentials;
use crate::error::ExitCode;
use crate::merge::merge;
use crate::model::ResolvedRecord;
use crate::remote::{
    sync_records, HttpRemote, MemoryRemote, RemoteStore, SyncPolicy, SyncReport,
};
use crate::resolver::{ResolveOptions, Resolver, StdinPrompt};
use crate::scanner;

/// Effective settings: CLI flags override the config file.
#[derive(Debug, Clone)]
struct Settings {
    movies_dirs: Vec<PathBuf>,
    catalog_path: Option<PathBuf>,
}

impl Settings {
    fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            movies_dirs: if cli.movies_dirs.is_empty() {
                config.movies_dirs.clone()
            } else {
                cli.movies_dirs.clone()
            },
            catalog_path: cli.catalog.clone().or_else(|| config.catalog_path.clone()),
        }
    }
}

/// Run the application logic for parsed CLI arguments.
///
/// Logging must already be initialized.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let config = Config::load();
    let settings = Settings::new(&cli, &config);

    match &cli.command {
        Commands::Check(args) => run_check(&settings, args),
        Commands::Sync(args) => run_sync(&settings, &config.remote, args),
        Commands::Sample(args) => run_sample(&settings, &config.remote, args),
        Commands::Import(args) => run_import(&settings, args),
    }
}

fn run_check(settings: &Settings, args: &CheckArgs) -> Result<ExitCode> {
    let catalog = open_catalog(settings)?;
    let opts = ResolveOptions {
        interactive: args.interactive,
        auto_open_browser: args.auto_open_web,
    };
    let batch = resolve_all(&catalog, &settings.movies_dirs, &opts)?;
    log::info!(
        "checked {} movies, {} skipped",
        batch.records.len() + batch.skipped,
        batch.skipped
    );
    Ok(batch_exit_code(batch.skipped))
}

fn run_sync(settings: &Settings, defaults: &RemoteConfig, args: &SyncArgs) -> Result<ExitCode> {
    let catalog = open_catalog(settings)?;
    let batch = resolve_all(&catalog, &settings.movies_dirs, &ResolveOptions::default())?;
    log::info!("syncing {} watched movies", batch.records.len());

    let mut remote = build_remote(&args.remote, defaults)?;
    let report = sync_records(
        remote.as_mut(),
        &batch.records,
        SyncPolicy::ReplaceExisting,
        &seen_extras(true),
    )?;
    report_sync(&report);
    Ok(batch_exit_code(batch.skipped))
}

fn run_sample(settings: &Settings, defaults: &RemoteConfig, args: &SampleArgs) -> Result<ExitCode> {
    let catalog = open_catalog(settings)?;
    let records: Vec<ResolvedRecord> = catalog
        .sample(args.number)?
        .into_iter()
        .map(ResolvedRecord::from_canonical)
        .collect();
    log::info!("seeding {} random catalog records", records.len());

    let mut remote = build_remote(&args.remote, defaults)?;
    // Seed-only: existing documents, and their seen flags, are untouched.
    let report = sync_records(
        remote.as_mut(),
        &records,
        SyncPolicy::InsertOnly,
        &seen_extras(false),
    )?;
    report_sync(&report);
    Ok(ExitCode::Success)
}

fn run_import(settings: &Settings, args: &ImportArgs) -> Result<ExitCode> {
    let path = settings.catalog_path.clone().context(
        "no catalog path configured; pass --catalog or set catalog_path in the config file",
    )?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut catalog = SqliteCatalog::open(&path)
        .with_context(|| format!("failed to open catalog at {}", path.display()))?;
    let count = catalog
        .import_tsv_file(&args.dump)
        .with_context(|| format!("failed to import {}", args.dump.display()))?;
    log::info!("imported {count} titles into {}", path.display());
    Ok(ExitCode::Success)
}

/// A batch of resolved records plus the items that could not be resolved.
struct ResolvedBatch {
    records: Vec<ResolvedRecord>,
    skipped: usize,
}

fn resolve_all(
    catalog: &dyn CatalogStore,
    movies_dirs: &[PathBuf],
    opts: &ResolveOptions,
) -> Result<ResolvedBatch> {
    if movies_dirs.is_empty() {
        bail!(
            "no movies directories configured; \
             pass -m/--movies-dir or set movies_dirs in the config file"
        );
    }

    let cache = SidecarCache::new();
    let prompt = StdinPrompt;
    let resolver = Resolver::new(catalog, &cache, &prompt);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for root in movies_dirs {
        let items = scanner::scan_root(root)
            .with_context(|| format!("failed to scan {}", root.display()))?;
        for item in items {
            let local = match item {
                Ok(local) => local,
                Err(err) => {
                    log::warn!("skipping: {err}");
                    skipped += 1;
                    continue;
                }
            };
            match resolver.resolve(&local, opts) {
                Ok(resolution) => {
                    log::debug!("{local}: resolved as {}", resolution.record().id);
                    records.push(merge(&local, resolution.record()));
                }
                Err(err) if err.is_lookup_failure() => {
                    log::warn!("skipping {local}: {err}");
                    skipped += 1;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to resolve {local}"))
                }
            }
        }
    }
    Ok(ResolvedBatch { records, skipped })
}

fn open_catalog(settings: &Settings) -> Result<SqliteCatalog> {
    let path = settings.catalog_path.clone().context(
        "no catalog path configured; pass --catalog or set catalog_path in the config file",
    )?;
    if !path.exists() {
        bail!(
            "catalog not found at {}; build it first with `reelsync import`",
            path.display()
        );
    }
    SqliteCatalog::open(&path)
        .with_context(|| format!("failed to open catalog at {}", path.display()))
}

fn build_remote(args: &RemoteArgs, defaults: &RemoteConfig) -> Result<Box<dyn RemoteStore>> {
    if args.dry_run {
        log::info!("dry run: applying the batch to an in-process store");
        return Ok(Box::new(MemoryRemote::new()));
    }

    let server = args
        .server
        .clone()
        .or_else(|| defaults.server.clone())
        .context("no remote server configured; pass --server or set it in the config file")?;
    let database = args
        .database
        .clone()
        .or_else(|| defaults.database.clone())
        .context("no remote database configured; pass --database or set it in the config file")?;
    let mut remote = HttpRemote::new(&server, &database);

    // An explicit --user overrides a configured no_auth.
    let no_auth = args.no_auth || (defaults.no_auth && args.user.is_none());
    if !no_auth {
        let user = args
            .user
            .clone()
            .or_else(|| defaults.user.clone())
            .context("no remote user configured; pass --user or --no-auth")?;
        let password = credentials::resolve_password(&user, args.prompt_password)?;
        remote = remote.with_basic_auth(&user, &password);
    }
    Ok(Box::new(remote))
}

fn seen_extras(seen: bool) -> Map<String, Value> {
    let mut extras = Map::new();
    extras.insert("seen".to_string(), Value::Bool(seen));
    extras
}

fn report_sync(report: &SyncReport) {
    let new = report.new_documents();
    if new > 0 {
        log::info!("{new} new movies");
    }
    if report.modified > 0 {
        log::info!("{} movies updated", report.modified);
    }
    if new == 0 && report.modified == 0 {
        log::info!("remote store already up to date ({} records)", report.records);
    }
}

fn batch_exit_code(skipped: usize) -> ExitCode {
    if skipped > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(cli: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(cli).unwrap();
        Settings::new(&cli, &Config::default())
    }

    #[test]
    fn test_cli_flags_override_empty_config() {
        let settings = settings(&["reelsync", "-m", "/movies", "--catalog", "/db", "check"]);
        assert_eq!(settings.movies_dirs, vec![PathBuf::from("/movies")]);
        assert_eq!(settings.catalog_path, Some(PathBuf::from("/db")));
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let cli = Cli::try_parse_from(["reelsync", "check"]).unwrap();
        let config = Config {
            movies_dirs: vec![PathBuf::from("/from-config")],
            catalog_path: Some(PathBuf::from("/config-db")),
            ..Config::default()
        };
        let settings = Settings::new(&cli, &config);
        assert_eq!(settings.movies_dirs, vec![PathBuf::from("/from-config")]);
        assert_eq!(settings.catalog_path, Some(PathBuf::from("/config-db")));
    }

    #[test]
    fn test_cli_movies_dirs_replace_config_dirs() {
        let cli = Cli::try_parse_from(["reelsync", "-m", "/cli", "check"]).unwrap();
        let config = Config {
            movies_dirs: vec![PathBuf::from("/from-config")],
            ..Config::default()
        };
        let settings = Settings::new(&cli, &config);
        assert_eq!(settings.movies_dirs, vec![PathBuf::from("/cli")]);
    }

    #[test]
    fn test_dry_run_uses_in_process_store() {
        let cli = Cli::try_parse_from(["reelsync", "sync", "--dry-run"]).unwrap();
        let Commands::Sync(args) = &cli.command else {
            panic!("Expected Sync command");
        };
        // No server/user configured; dry-run must not need them.
        assert!(build_remote(&args.remote, &RemoteConfig::default()).is_ok());
    }

    #[test]
    fn test_remote_requires_server() {
        let cli = Cli::try_parse_from(["reelsync", "sync", "--no-auth"]).unwrap();
        let Commands::Sync(args) = &cli.command else {
            panic!("Expected Sync command");
        };
        let err = build_remote(&args.remote, &RemoteConfig::default())
            .err()
            .expect("expected build_remote to fail");
        assert!(err.to_string().contains("no remote server"));
    }

    #[test]
    fn test_batch_exit_codes() {
        assert_eq!(batch_exit_code(0), ExitCode::Success);
        assert_eq!(batch_exit_code(3), ExitCode::PartialSuccess);
    }

    #[test]
    fn test_seen_extras_shape() {
        let extras = seen_extras(true);
        assert_eq!(extras.get("seen"), Some(&Value::Bool(true)));
        assert_eq!(seen_extras(false).get("seen"), Some(&Value::Bool(false)));
    }
}
