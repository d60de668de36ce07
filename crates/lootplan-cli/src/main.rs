//! Command-line entry point for Lootplan.
//!
//! Loads configuration and the item catalog, opens the selection store, and
//! runs one subcommand. Every invocation recomputes the plan from the
//! persisted inputs.
//!
//! # Architecture
//!
//! ```text
//! lootplan.yaml --> Catalog --> LootPlanner --> stdout
//!                     ^             ^
//!                     |             |
//!               items.json    SelectionRepository (state dir)
//! ```
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

mod cli;
mod commands;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use lootplan_catalog::Catalog;
use lootplan_core::LootplanConfig;
use lootplan_core::config::LoggingConfig;
use lootplan_store::{FileStore, SelectionRepository};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Session;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG_FILE: &str = "lootplan.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the catalog, or the selection store
/// cannot be loaded, or if the subcommand fails.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    debug!(
        catalog = %config.catalog.path.display(),
        state_dir = %config.store.state_dir.display(),
        max_depth = config.resolver.max_depth,
        "configuration loaded"
    );

    let catalog = Catalog::from_file(&config.catalog.path)
        .with_context(|| format!("loading catalog {}", config.catalog.path.display()))?;
    info!(items = catalog.len(), "catalog ready");

    let mut repo = SelectionRepository::new(FileStore::new(config.store.state_dir.clone()));
    let session = Session {
        catalog: &catalog,
        resolver: config.resolver,
    };
    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, session, &mut repo, &mut stdout)
}

/// Load the explicit config file, else `./lootplan.yaml` if present, else
/// defaults. Environment overrides apply in every case.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<LootplanConfig> {
    let path = explicit.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
    if explicit.is_none() && !path.exists() {
        let mut config = LootplanConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        return Ok(config);
    }
    LootplanConfig::from_file(&path)
        .with_context(|| format!("loading config {}", path.display()))
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
