//! Plain-text rendering of plans, trees, and breakdowns.

use std::io::{self, Write};

use lootplan_catalog::{Catalog, UpgradeStep};
use lootplan_core::{FacetCounts, FilterOptions, LootEntry, LootPlan};
use lootplan_types::{CraftingNode, ItemId, Relationship, SourceMethod, UsageEntry};

/// Write the loot list and raw material totals.
pub fn plan<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    plan: &LootPlan,
    shown: &[&LootEntry],
) -> io::Result<()> {
    if plan.enabled_goals.is_empty() {
        writeln!(out, "No enabled goals. Add one with `lootplan goal add <ITEM>`.")?;
        return Ok(());
    }

    let goals: Vec<&str> = plan
        .enabled_goals
        .iter()
        .map(|id| catalog.display_name(id.as_str()))
        .collect();
    writeln!(out, "Goals: {}", goals.join(", "))?;
    writeln!(out)?;
    writeln!(out, "Loot ({} of {}):", shown.len(), plan.loot.len())?;
    for entry in shown {
        let action = entry.action.map_or_else(|| String::from("-"), |a| a.to_string());
        writeln!(
            out,
            "  {action:<8} {name:<32} {rarity:<10} {kind:<18} goals: {goals}",
            name = entry.name,
            rarity = entry.rarity.as_str(),
            kind = entry.item_type,
            goals = entry.goal_count,
        )?;
    }

    if !plan.material_totals.is_empty() {
        writeln!(out)?;
        writeln!(out, "Materials:")?;
        totals(out, catalog, &plan.material_totals)?;
    }
    Ok(())
}

fn totals<'a, W: Write>(
    out: &mut W,
    catalog: &Catalog,
    totals: impl IntoIterator<Item = (&'a ItemId, &'a u32)>,
) -> io::Result<()> {
    for (id, quantity) in totals {
        writeln!(out, "  {} x{quantity}", catalog.display_name(id.as_str()))?;
    }
    Ok(())
}

/// Write a crafting tree as an indented outline.
pub fn tree<W: Write>(out: &mut W, catalog: &Catalog, root: &CraftingNode) -> io::Result<()> {
    node(out, catalog, root, 0)
}

fn node<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    node_ref: &CraftingNode,
    depth: usize,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    write!(
        out,
        "{indent}{} x{}",
        catalog.display_name(node_ref.item_id.as_str()),
        node_ref.quantity
    )?;
    if !node_ref.salvageable_from.is_empty() {
        let sources: Vec<String> = node_ref
            .salvageable_from
            .iter()
            .map(|s| {
                let verb = match s.method {
                    SourceMethod::Salvage => "salvage",
                    SourceMethod::Recycle => "recycle",
                };
                format!("{verb} {}", catalog.display_name(s.item_id.as_str()))
            })
            .collect();
        write!(out, "  <- {}", sources.join(", "))?;
    }
    writeln!(out)?;
    for child in &node_ref.children {
        node(out, catalog, child, depth.saturating_add(1))?;
    }
    Ok(())
}

/// Write the usages behind an item's action.
pub fn usages<W: Write>(out: &mut W, catalog: &Catalog, usages: &[UsageEntry]) -> io::Result<()> {
    for usage in usages {
        let goals: Vec<&str> = usage
            .goal_item_ids
            .iter()
            .map(|id| catalog.display_name(id.as_str()))
            .collect();
        writeln!(
            out,
            "  {} for {} x{} (goals: {})",
            relationship_label(usage.relationship),
            catalog.display_name(usage.parent_item_id.as_str()),
            usage.quantity,
            goals.join(", ")
        )?;
    }
    Ok(())
}

/// Write per-tier build steps.
pub fn breakdown<W: Write>(out: &mut W, catalog: &Catalog, steps: &[UpgradeStep]) -> io::Result<()> {
    for step in steps {
        writeln!(out, "Tier {}: {}", step.tier, step.item_name)?;
        totals(out, catalog, &step.materials)?;
    }
    Ok(())
}

/// Write filter options with match counts.
pub fn filters<W: Write>(
    out: &mut W,
    options: &FilterOptions,
    counts: &FacetCounts,
) -> io::Result<()> {
    writeln!(out, "Types:")?;
    for kind in &options.types {
        writeln!(out, "  {kind} ({})", counts.types.get(kind).copied().unwrap_or(0))?;
    }
    writeln!(out, "Rarities:")?;
    for rarity in &options.rarities {
        writeln!(out, "  {rarity} ({})", counts.rarities.get(rarity).copied().unwrap_or(0))?;
    }
    writeln!(out, "Locations:")?;
    for location in &options.locations {
        writeln!(
            out,
            "  {location} ({})",
            counts.locations.get(location).copied().unwrap_or(0)
        )?;
    }
    Ok(())
}

/// Short label for a usage relationship.
const fn relationship_label(relationship: Relationship) -> &'static str {
    match relationship {
        Relationship::Recipe => "ingredient",
        Relationship::Salvage => "salvage",
        Relationship::Recycle => "recycle",
    }
}
