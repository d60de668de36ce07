//! Subcommand handlers.
//!
//! Every handler reads the current selections from the repository, does its
//! work, and writes human-readable (or JSON) output to `out`. Planning is
//! recomputed from scratch on every invocation.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use anyhow::{Context as _, bail};
use lootplan_catalog::Catalog;
use lootplan_core::{
    FacetCounts, FilterOptions, LootEntry, LootFilter, LootPlanner, ResolverConfig, TreeBuilder,
    active_stash, filter_options,
};
use lootplan_store::{KeyValueStore, SelectionRepository};
use lootplan_types::{ItemId, Selections};
use serde::Serialize;
use tracing::info;

use crate::cli::{Command, PlanArgs, SelectionCommand};
use crate::render;

/// Read-only inputs shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    /// The loaded item catalog.
    pub catalog: &'a Catalog,
    /// Tree expansion limits.
    pub resolver: ResolverConfig,
}

/// Dispatch one subcommand.
pub fn run<S, W>(
    command: Command,
    ctx: Session<'_>,
    repo: &mut SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Plan(args) => plan(&args, ctx, repo, out),
        Command::Filters { json } => filters(json, ctx, repo, out),
        Command::Tree { goal, json } => tree(&goal, json, ctx, repo, out),
        Command::Action { item } => action(&item, ctx, repo, out),
        Command::Breakdown { item } => breakdown(&item, ctx, out),
        Command::Goal(edit) => goal(edit, ctx, repo, out),
        Command::Stash(edit) => stash(edit, ctx, repo, out),
    }
}

/// Resolve an id or case-insensitive display name to a catalog id.
fn resolve_item(catalog: &Catalog, raw: &str) -> anyhow::Result<ItemId> {
    let raw = raw.trim();
    if let Some(item) = catalog.get(raw) {
        return Ok(item.id.clone());
    }
    catalog
        .items()
        .find(|item| item.display_name().eq_ignore_ascii_case(raw))
        .map(|item| item.id.clone())
        .with_context(|| format!("unknown item `{raw}`"))
}

// =============================================================================
// Planning
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport<'a> {
    enabled_goals: &'a [ItemId],
    loot: Vec<&'a LootEntry>,
    facet_counts: FacetCounts,
    material_totals: &'a BTreeMap<ItemId, u32>,
}

fn plan<S: KeyValueStore, W: Write>(
    args: &PlanArgs,
    ctx: Session<'_>,
    repo: &mut SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    let selections = repo.load_selections();
    let plan = LootPlanner::new(ctx.catalog, ctx.resolver).plan(&selections);

    let mut filter = repo.load_filter();
    apply_plan_args(args, &mut filter);
    if args.save_filter {
        repo.save_filter(&filter).context("saving filters")?;
        info!("saved display filters");
    }

    let shown = plan.filtered_loot(&filter);
    if args.json {
        let report = PlanReport {
            enabled_goals: &plan.enabled_goals,
            loot: shown,
            facet_counts: plan.facet_counts(),
            material_totals: &plan.material_totals,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        render::plan(out, ctx.catalog, &plan, &shown)?;
    }
    Ok(())
}

/// Command-line filters replace the stored ones they name.
fn apply_plan_args(args: &PlanArgs, filter: &mut LootFilter) {
    if args.search.is_some() {
        filter.search.clone_from(&args.search);
    }
    if !args.types.is_empty() {
        filter.types = Some(args.types.iter().cloned().collect());
    }
    if !args.rarities.is_empty() {
        filter.rarities = Some(args.rarities.iter().copied().collect());
    }
    if !args.locations.is_empty() {
        filter.locations = Some(args.locations.iter().cloned().collect());
    }
}

#[derive(Serialize)]
struct FiltersReport<'a> {
    options: &'a FilterOptions,
    counts: &'a FacetCounts,
}

fn filters<S: KeyValueStore, W: Write>(
    json: bool,
    ctx: Session<'_>,
    repo: &SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    let options = filter_options(ctx.catalog);
    let counts = LootPlanner::new(ctx.catalog, ctx.resolver)
        .plan(&repo.load_selections())
        .facet_counts();
    if json {
        let report = FiltersReport {
            options: &options,
            counts: &counts,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        render::filters(out, &options, &counts)?;
    }
    Ok(())
}

fn tree<S: KeyValueStore, W: Write>(
    raw: &str,
    json: bool,
    ctx: Session<'_>,
    repo: &SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    let goal = resolve_item(ctx.catalog, raw)?;
    let selections = repo.load_selections();
    let mut goals = selections.enabled_goals();
    if !goals.contains(&goal) {
        goals.push(goal.clone());
    }
    let stash = active_stash(&selections.stash, &selections.disabled_stash);

    let tree = TreeBuilder::new(ctx.catalog, &goals, &stash)
        .with_max_depth(ctx.resolver.max_depth)
        .build(&goal);
    if json {
        serde_json::to_writer_pretty(&mut *out, &tree)?;
        writeln!(out)?;
    } else {
        render::tree(out, ctx.catalog, &tree.root)?;
    }
    Ok(())
}

fn action<S: KeyValueStore, W: Write>(
    raw: &str,
    ctx: Session<'_>,
    repo: &SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = resolve_item(ctx.catalog, raw)?;
    let plan = LootPlanner::new(ctx.catalog, ctx.resolver).plan(&repo.load_selections());
    let name = ctx.catalog.display_name(item.as_str());

    match plan.action_for(item.as_str()) {
        Some(action) => {
            writeln!(out, "{name}: {action}")?;
            render::usages(
                out,
                ctx.catalog,
                plan.reverse_map.get(item.as_str()).unwrap_or_default(),
            )?;
        }
        None => writeln!(out, "{name}: not needed for any enabled goal")?,
    }
    Ok(())
}

fn breakdown<W: Write>(raw: &str, ctx: Session<'_>, out: &mut W) -> anyhow::Result<()> {
    let item = resolve_item(ctx.catalog, raw)?;
    let steps = ctx.catalog.upgrade_breakdown(item.as_str());
    if steps.is_empty() {
        writeln!(out, "{} has no recipe", ctx.catalog.display_name(item.as_str()))?;
    } else {
        render::breakdown(out, ctx.catalog, &steps)?;
    }
    Ok(())
}

// =============================================================================
// Selection editing
// =============================================================================

fn goal<S: KeyValueStore, W: Write>(
    edit: SelectionCommand,
    ctx: Session<'_>,
    repo: &mut SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    match edit {
        SelectionCommand::Add { item } => {
            let id = resolve_item(ctx.catalog, &item)?;
            repo.add_goal(&id).context("saving goals")?;
            info!(item_id = %id, "added goal");
        }
        SelectionCommand::Remove { item } => {
            let id = resolve_stored(ctx.catalog, &item, &repo.load_goals())?;
            repo.remove_goal(&id).context("saving goals")?;
            let mut disabled = repo.load_disabled_goals();
            if disabled.remove(&id) {
                repo.save_disabled_goals(&disabled).context("saving disabled goals")?;
            }
            info!(item_id = %id, "removed goal");
        }
        SelectionCommand::Enable { item } => {
            let id = require_listed(ctx.catalog, &item, &repo.load_goals(), "goal")?;
            let mut disabled = repo.load_disabled_goals();
            disabled.remove(&id);
            repo.save_disabled_goals(&disabled).context("saving disabled goals")?;
        }
        SelectionCommand::Disable { item } => {
            let id = require_listed(ctx.catalog, &item, &repo.load_goals(), "goal")?;
            let mut disabled = repo.load_disabled_goals();
            disabled.insert(id);
            repo.save_disabled_goals(&disabled).context("saving disabled goals")?;
        }
        SelectionCommand::List => {}
    }
    list_goals(ctx.catalog, &repo.load_selections(), out)
}

fn stash<S: KeyValueStore, W: Write>(
    edit: SelectionCommand,
    ctx: Session<'_>,
    repo: &mut SelectionRepository<S>,
    out: &mut W,
) -> anyhow::Result<()> {
    match edit {
        SelectionCommand::Add { item } => {
            let id = resolve_item(ctx.catalog, &item)?;
            let mut stash = repo.load_stash();
            stash.insert(id.clone());
            repo.save_stash(&stash).context("saving stash")?;
            info!(item_id = %id, "added to stash");
        }
        SelectionCommand::Remove { item } => {
            let mut stash = repo.load_stash();
            let listed: Vec<ItemId> = stash.iter().cloned().collect();
            let id = resolve_stored(ctx.catalog, &item, &listed)?;
            stash.remove(&id);
            repo.save_stash(&stash).context("saving stash")?;
            let mut disabled = repo.load_disabled_stash();
            if disabled.remove(&id) {
                repo.save_disabled_stash(&disabled).context("saving disabled stash")?;
            }
            info!(item_id = %id, "removed from stash");
        }
        SelectionCommand::Enable { item } => {
            let listed: Vec<ItemId> = repo.load_stash().into_iter().collect();
            let id = require_listed(ctx.catalog, &item, &listed, "stash")?;
            let mut disabled = repo.load_disabled_stash();
            disabled.remove(&id);
            repo.save_disabled_stash(&disabled).context("saving disabled stash")?;
        }
        SelectionCommand::Disable { item } => {
            let listed: Vec<ItemId> = repo.load_stash().into_iter().collect();
            let id = require_listed(ctx.catalog, &item, &listed, "stash")?;
            let mut disabled = repo.load_disabled_stash();
            disabled.insert(id);
            repo.save_disabled_stash(&disabled).context("saving disabled stash")?;
        }
        SelectionCommand::List => {}
    }
    list_stash(ctx.catalog, &repo.load_selections(), out)
}

/// Resolve `raw` against a stored list first, then the catalog.
///
/// Stored ids may have left the catalog since they were saved; those are
/// still addressable by their exact id.
fn resolve_stored(catalog: &Catalog, raw: &str, listed: &[ItemId]) -> anyhow::Result<ItemId> {
    let trimmed = raw.trim();
    if let Some(id) = listed.iter().find(|id| id.as_str() == trimmed) {
        return Ok(id.clone());
    }
    resolve_item(catalog, trimmed)
}

/// Resolve `raw` and require it to be one of `listed`.
fn require_listed(
    catalog: &Catalog,
    raw: &str,
    listed: &[ItemId],
    what: &str,
) -> anyhow::Result<ItemId> {
    let id = resolve_stored(catalog, raw, listed)?;
    if !listed.contains(&id) {
        bail!("`{id}` is not in the {what} list");
    }
    Ok(id)
}

fn list_goals<W: Write>(catalog: &Catalog, selections: &Selections, out: &mut W) -> anyhow::Result<()> {
    if selections.goals.is_empty() {
        writeln!(out, "No goals.")?;
    }
    for id in &selections.goals {
        write_selection_line(out, catalog, id, &selections.disabled_goals)?;
    }
    Ok(())
}

fn list_stash<W: Write>(catalog: &Catalog, selections: &Selections, out: &mut W) -> anyhow::Result<()> {
    if selections.stash.is_empty() {
        writeln!(out, "Stash is empty.")?;
    }
    for id in &selections.stash {
        write_selection_line(out, catalog, id, &selections.disabled_stash)?;
    }
    Ok(())
}

fn write_selection_line<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    id: &ItemId,
    disabled: &BTreeSet<ItemId>,
) -> anyhow::Result<()> {
    let marker = if disabled.contains(id) { " (disabled)" } else { "" };
    writeln!(out, "  {} [{id}]{marker}", catalog.display_name(id.as_str()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use clap::Parser;
    use lootplan_store::MemoryStore;

    use super::*;
    use crate::cli::Cli;

    const CATALOG_JSON: &str = r#"[
        { "id": "heavy_shield", "name": { "en": "Heavy Shield" }, "type": "Shield", "rarity": "Epic",
          "recipe": { "power_rod": 1, "wires": 2 } },
        { "id": "power_rod", "name": { "en": "Power Rod" }, "type": "Topside Material", "rarity": "Rare",
          "recipe": { "sensor": 2 }, "foundIn": ["Arc"] },
        { "id": "sensor", "name": { "en": "Sensor" }, "type": "Topside Material", "rarity": "Uncommon",
          "foundIn": ["Technological"] },
        { "id": "wires", "name": { "en": "Wires" }, "type": "Topside Material", "rarity": "Common",
          "foundIn": ["Electrical"] },
        { "id": "broken_radio", "name": { "en": "Broken Radio" }, "type": "Recyclable", "rarity": "Uncommon",
          "salvagesInto": { "sensor": 1 }, "foundIn": ["Residential"] }
    ]"#;

    struct Harness {
        catalog: Catalog,
        repo: SelectionRepository<MemoryStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                catalog: Catalog::parse(CATALOG_JSON).unwrap(),
                repo: SelectionRepository::new(MemoryStore::new()),
            }
        }

        fn run(&mut self, args: &[&str]) -> anyhow::Result<String> {
            let cli = Cli::try_parse_from(std::iter::once("lootplan").chain(args.iter().copied()))?;
            let ctx = Session {
                catalog: &self.catalog,
                resolver: ResolverConfig::default(),
            };
            let mut out = Vec::new();
            run(cli.command, ctx, &mut self.repo, &mut out)?;
            Ok(String::from_utf8(out)?)
        }
    }

    #[test]
    fn goal_add_accepts_display_names_and_rejects_unknown_ids() {
        let mut h = Harness::new();
        let listing = h.run(&["goal", "add", "heavy shield"]).unwrap();
        assert!(listing.contains("Heavy Shield [heavy_shield]"));

        let err = h.run(&["goal", "add", "ghost_item"]).unwrap_err();
        assert!(err.to_string().contains("ghost_item"));
        assert_eq!(h.repo.load_goals(), vec![ItemId::from("heavy_shield")]);
    }

    #[test]
    fn plan_lists_loot_for_goals() {
        let mut h = Harness::new();
        h.run(&["goal", "add", "heavy_shield"]).unwrap();
        let text = h.run(&["plan"]).unwrap();
        assert!(text.contains("Goals: Heavy Shield"));
        assert!(text.contains("Broken Radio"));
        assert!(text.contains("Materials:"));
        assert!(text.contains("Sensor x2"));
    }

    #[test]
    fn plan_json_applies_filters() {
        let mut h = Harness::new();
        h.run(&["goal", "add", "heavy_shield"]).unwrap();
        let json = h.run(&["plan", "--json", "--location", "Residential"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let loot = value["loot"].as_array().unwrap();
        // Only the radio is found in residential areas.
        assert_eq!(loot.len(), 1);
        assert_eq!(loot[0]["itemId"], "broken_radio");
        assert_eq!(loot[0]["action"], "salvage");
        assert_eq!(value["facetCounts"]["types"]["Topside Material"], 3);
    }

    #[test]
    fn saved_filter_is_reused() {
        let mut h = Harness::new();
        h.run(&["goal", "add", "heavy_shield"]).unwrap();
        h.run(&["plan", "--rarity", "common", "--save-filter"]).unwrap();
        let text = h.run(&["plan"]).unwrap();
        assert!(text.contains("Loot (1 of 4)"));
        assert!(text.contains("Wires"));
    }

    #[test]
    fn stashing_prunes_subtree_and_disable_restores_it() {
        let mut h = Harness::new();
        h.run(&["goal", "add", "heavy_shield"]).unwrap();
        h.run(&["stash", "add", "power_rod"]).unwrap();
        let text = h.run(&["action", "sensor"]).unwrap();
        assert!(text.contains("not needed"));

        let listing = h.run(&["stash", "disable", "power_rod"]).unwrap();
        assert!(listing.contains("Power Rod [power_rod] (disabled)"));
        let text = h.run(&["action", "sensor"]).unwrap();
        assert!(text.contains("Sensor: keep"));
        assert!(text.contains("ingredient for Power Rod x2"));
    }

    #[test]
    fn disabling_unlisted_goal_is_an_error() {
        let mut h = Harness::new();
        let err = h.run(&["goal", "disable", "wires"]).unwrap_err();
        assert!(err.to_string().contains("not in the goal list"));
    }

    #[test]
    fn stored_ids_missing_from_catalog_can_be_removed() {
        let mut h = Harness::new();
        let retired = ItemId::from("retired_item");
        h.repo
            .save_goals(&[retired.clone(), ItemId::from("heavy_shield")])
            .unwrap();
        h.repo
            .save_disabled_goals(&BTreeSet::from([retired.clone()]))
            .unwrap();
        h.repo.save_stash(&BTreeSet::from([retired.clone()])).unwrap();

        let listing = h.run(&["goal", "remove", " retired_item "]).unwrap();
        assert!(!listing.contains("retired_item"));
        assert_eq!(h.repo.load_goals(), vec![ItemId::from("heavy_shield")]);
        assert!(h.repo.load_disabled_goals().is_empty());

        h.run(&["stash", "remove", "retired_item"]).unwrap();
        assert!(h.repo.load_stash().is_empty());

        let err = h.run(&["goal", "remove", "never_saved"]).unwrap_err();
        assert!(err.to_string().contains("never_saved"));
    }

    #[test]
    fn tree_renders_salvage_sources() {
        let mut h = Harness::new();
        let text = h.run(&["tree", "power_rod"]).unwrap();
        assert!(text.starts_with("Power Rod x1"));
        assert!(text.contains("  Sensor x2  <- salvage Broken Radio"));
    }

    #[test]
    fn breakdown_of_plain_item() {
        let mut h = Harness::new();
        let text = h.run(&["breakdown", "heavy_shield"]).unwrap();
        assert!(text.contains("Tier 1: Heavy Shield"));
        assert!(text.contains("Wires x2"));
        let text = h.run(&["breakdown", "wires"]).unwrap();
        assert!(text.contains("has no recipe"));
    }
}
