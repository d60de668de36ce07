//! End-to-end loot planning.
//!
//! [`LootPlanner`] runs the whole pipeline for one snapshot of the player's
//! selections:
//!
//! 1. Enabled goals and the active stash are derived from [`Selections`].
//! 2. One crafting tree is built per enabled goal.
//! 3. The trees are inverted into a pruned [`ReverseUsageMap`].
//! 4. The map is turned into a sorted loot list and raw material totals.
//!
//! Nothing is cached between calls; re-plan after any selection change.

use std::collections::{BTreeMap, BTreeSet};

use lootplan_catalog::Catalog;
use lootplan_types::{CraftingTree, ItemAction, ItemId, Selections};
use serde::Serialize;
use tracing::info;

use crate::action::classify;
use crate::config::ResolverConfig;
use crate::loot::{FacetCounts, LootEntry, LootFilter, build_loot_list};
use crate::reverse::{ReverseUsageMap, build_reverse_map};
use crate::stash::active_stash;
use crate::tree::{TreeBuilder, combine_trees};

/// Runs the resolver pipeline against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct LootPlanner<'a> {
    catalog: &'a Catalog,
    config: ResolverConfig,
}

impl<'a> LootPlanner<'a> {
    /// Create a planner over `catalog`.
    pub const fn new(catalog: &'a Catalog, config: ResolverConfig) -> Self {
        Self { catalog, config }
    }

    /// Compute the full plan for `selections`.
    pub fn plan(&self, selections: &Selections) -> LootPlan {
        let enabled_goals = selections.enabled_goals();
        let active_stash = active_stash(&selections.stash, &selections.disabled_stash);

        let builder = TreeBuilder::new(self.catalog, &enabled_goals, &active_stash)
            .with_max_depth(self.config.max_depth);
        let trees: Vec<CraftingTree> = enabled_goals.iter().map(|goal| builder.build(goal)).collect();

        let reverse_map = build_reverse_map(&trees, &active_stash);
        let loot = build_loot_list(&reverse_map, self.catalog, &selections.goals, &active_stash);
        let material_totals = combine_trees(&trees);

        info!(
            goals = enabled_goals.len(),
            stashed = active_stash.len(),
            needed = reverse_map.len(),
            loot = loot.len(),
            "computed loot plan"
        );

        LootPlan {
            enabled_goals,
            active_stash,
            trees,
            reverse_map,
            loot,
            material_totals,
        }
    }
}

/// Everything derived from one selection snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LootPlan {
    /// Goals that were expanded, in goal-list order.
    pub enabled_goals: Vec<ItemId>,
    /// Stash entries that were treated as already held.
    pub active_stash: BTreeSet<ItemId>,
    /// One tree per enabled goal.
    pub trees: Vec<CraftingTree>,
    /// Pruned reverse usage map.
    pub reverse_map: ReverseUsageMap,
    /// Lootable items still needed, sorted by name.
    pub loot: Vec<LootEntry>,
    /// Leaf material totals across all trees.
    pub material_totals: BTreeMap<ItemId, u32>,
}

impl LootPlan {
    /// Recommended action for `item_id`.
    pub fn action_for(&self, item_id: &str) -> Option<ItemAction> {
        classify(item_id, &self.reverse_map)
    }

    /// The tree built for `goal`, if it is enabled.
    pub fn tree_for(&self, goal: &str) -> Option<&CraftingTree> {
        self.trees.iter().find(|t| t.goal_item_id.as_str() == goal)
    }

    /// Loot entries passing `filter`.
    pub fn filtered_loot(&self, filter: &LootFilter) -> Vec<&LootEntry> {
        filter.apply(&self.loot)
    }

    /// Per-option counts over the unfiltered loot list.
    pub fn facet_counts(&self) -> FacetCounts {
        FacetCounts::from_entries(&self.loot)
    }
}
