//! Crafting-dependency resolution and loot planning for Lootplan.
//!
//! This crate turns a catalog, a goal list, and a stash into a "what to
//! loot" plan. Every function here is pure and synchronous: inputs are
//! immutable snapshots and the whole pipeline is re-run whenever any input
//! changes.
//!
//! ```text
//! Catalog + goals + stash --> Tree Builder --> Reverse Index --> Pruner --> Classifier
//! ```
//!
//! # Modules
//!
//! - [`action`] -- Recommended action per item ([`classify`])
//! - [`config`] -- Configuration loading from `lootplan.yaml`
//! - [`loot`] -- Loot list assembly, display filters, and facet counts
//! - [`planner`] -- [`LootPlanner`] runs the full pipeline for a selection
//! - [`reverse`] -- [`ReverseUsageMap`] construction and orphan pruning
//! - [`stash`] -- Active stash computation
//! - [`tree`] -- Crafting tree expansion ([`TreeBuilder`])

pub mod action;
pub mod config;
pub mod loot;
pub mod planner;
pub mod reverse;
pub mod stash;
pub mod tree;

pub use action::classify;
pub use config::{ConfigError, LootplanConfig, ResolverConfig};
pub use loot::{FacetCounts, FilterOptions, LootEntry, LootFilter, build_loot_list, filter_options};
pub use planner::{LootPlan, LootPlanner};
pub use reverse::{ReverseUsageMap, build_reverse_map};
pub use stash::active_stash;
pub use tree::{TreeBuilder, build_crafting_tree, combine_trees, flatten_tree};
