//! Weapon-tier consolidation.
//!
//! The raw catalog lists each weapon tier (`Kettle I` through `Kettle IV`)
//! as its own record: tier I carries a `recipe` and tiers II to IV carry the
//! `upgradeCost` from the previous tier. For planning, each tier family is
//! merged into a single record, the highest tier, whose recipe is the tier I
//! recipe plus every upgrade cost. The tree builder never sees tiers.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use lootplan_types::{Item, ItemId, MaterialMap};

/// Roman-numeral suffixes that mark a weapon tier in its display name.
const TIER_SUFFIXES: [&str; 4] = ["I", "II", "III", "IV"];

/// The highest weapon tier.
const MAX_TIER: u8 = 4;

/// Materials for one step of building a tiered weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStep {
    /// Tier reached by this step (1 for the initial craft).
    pub tier: u8,
    /// The tier's own item id.
    pub item_id: ItemId,
    /// The tier's display name.
    pub item_name: String,
    /// Materials spent on this step.
    pub materials: MaterialMap,
}

/// Strip a trailing tier numeral from a weapon name.
///
/// `"Kettle IV"` becomes `"Kettle"`; names without a numeral are returned
/// unchanged.
pub fn base_weapon_name(name: &str) -> &str {
    name.trim_end()
        .rsplit_once(char::is_whitespace)
        .filter(|(_, suffix)| TIER_SUFFIXES.contains(suffix))
        .map_or(name, |(base, _)| base.trim_end())
}

/// Merge tiered weapon records into one record per weapon family.
///
/// Returns the consolidated item list (non-tiered items first, in input
/// order, followed by one record per family in name order) and, for each
/// consolidated id, the family's original records sorted by tier.
pub fn consolidate_weapon_tiers(items: Vec<Item>) -> (Vec<Item>, BTreeMap<ItemId, Vec<Item>>) {
    let mut families: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    let mut consolidated = Vec::with_capacity(items.len());

    for item in items {
        if item.is_weapon && item.tier.is_some() {
            let base = String::from(base_weapon_name(item.display_name()));
            families.entry(base).or_default().push(item);
        } else {
            consolidated.push(item);
        }
    }

    let mut variants = BTreeMap::new();
    for (base, mut tiers) in families {
        tiers.sort_by_key(|t| t.tier.unwrap_or(0));

        let representative = tiers
            .iter()
            .find(|t| t.tier == Some(MAX_TIER))
            .or_else(|| tiers.last())
            .cloned();
        let Some(mut representative) = representative else {
            continue;
        };

        let mut recipe = MaterialMap::new();
        for tier in &tiers {
            for table in [tier.recipe.as_ref(), tier.upgrade_cost.as_ref()]
                .into_iter()
                .flatten()
            {
                add_materials(&mut recipe, table);
            }
        }

        debug!(
            weapon = base.as_str(),
            item_id = %representative.id,
            tiers = tiers.len(),
            materials = recipe.len(),
            "consolidated weapon tiers"
        );

        representative.recipe = Some(recipe);
        variants.insert(representative.id.clone(), tiers);
        consolidated.push(representative);
    }

    (consolidated, variants)
}

/// Break a consolidated weapon family into per-tier material steps.
///
/// Tier 1 contributes its recipe; later tiers contribute their upgrade
/// cost. Tiers with no materials are skipped.
pub(crate) fn upgrade_steps(tiers: &[Item]) -> Vec<UpgradeStep> {
    tiers
        .iter()
        .filter_map(|tier| {
            let level = tier.tier.unwrap_or(1);
            let materials = if level <= 1 {
                tier.recipe.as_ref()
            } else {
                tier.upgrade_cost.as_ref()
            }?;
            Some(UpgradeStep {
                tier: level,
                item_id: tier.id.clone(),
                item_name: String::from(tier.display_name()),
                materials: materials.clone(),
            })
        })
        .collect()
}

/// Add every quantity in `source` into `target`, saturating on overflow.
fn add_materials(target: &mut MaterialMap, source: &MaterialMap) {
    for (material, qty) in source {
        let entry = target.entry(material.clone()).or_insert(0);
        *entry = entry.saturating_add(*qty);
    }
}
