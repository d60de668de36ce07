//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lootplan_types::Rarity;

/// Plan what to loot for a set of crafting goals.
#[derive(Debug, Parser)]
#[command(name = "lootplan", version, about)]
pub struct Cli {
    /// Path to `lootplan.yaml`. Defaults to `./lootplan.yaml` when present.
    #[arg(long, global = true, env = "LOOTPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the loot list for the current goals and stash.
    Plan(PlanArgs),

    /// List filter options with how many loot entries match each.
    Filters {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show the crafting tree for one item.
    Tree {
        /// Item id or display name.
        goal: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show the recommended action for one item.
    Action {
        /// Item id or display name.
        item: String,
    },

    /// Show per-tier materials for a weapon or craftable item.
    Breakdown {
        /// Item id or display name.
        item: String,
    },

    /// Edit the goal list.
    #[command(subcommand)]
    Goal(SelectionCommand),

    /// Edit the stash.
    #[command(subcommand)]
    Stash(SelectionCommand),
}

/// Options for `plan`.
#[derive(Debug, Default, Args)]
pub struct PlanArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Only show items whose name contains this text.
    #[arg(long)]
    pub search: Option<String>,

    /// Only show these item types (repeatable).
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Only show these rarities (repeatable).
    #[arg(long = "rarity", value_name = "RARITY", value_parser = parse_rarity)]
    pub rarities: Vec<Rarity>,

    /// Only show items found in these locations (repeatable).
    #[arg(long = "location", value_name = "LOCATION")]
    pub locations: Vec<String>,

    /// Persist the type, rarity, and location filters for later runs.
    #[arg(long)]
    pub save_filter: bool,
}

/// Edits shared by `goal` and `stash`.
#[derive(Debug, Subcommand)]
pub enum SelectionCommand {
    /// Add an item.
    Add {
        /// Item id or display name.
        item: String,
    },
    /// Remove an item.
    Remove {
        /// Item id or display name.
        item: String,
    },
    /// Re-enable a disabled item.
    Enable {
        /// Item id or display name.
        item: String,
    },
    /// Keep an item but ignore it while planning.
    Disable {
        /// Item id or display name.
        item: String,
    },
    /// Show the current entries.
    List,
}

fn parse_rarity(raw: &str) -> Result<Rarity, String> {
    Rarity::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = Rarity::ALL.iter().map(|r| r.as_str()).collect();
        format!("unknown rarity `{raw}` (expected one of: {})", known.join(", "))
    })
}
