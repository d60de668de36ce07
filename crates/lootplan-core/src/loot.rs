//! Loot list assembly, display filters, and facet counts.
//!
//! The loot list is the user-facing view of the reverse usage map: one
//! [`LootEntry`] per lootable item that some goal still needs. Display
//! filters ([`LootFilter`]) narrow the list without changing the plan, and
//! [`FacetCounts`] report how many entries each filter option would match.

use std::collections::{BTreeMap, BTreeSet};

use lootplan_catalog::Catalog;
use lootplan_types::{Item, ItemAction, ItemId, Priority, Rarity, UsageEntry};
use serde::{Deserialize, Serialize};

use crate::action::classify;
use crate::reverse::ReverseUsageMap;

/// Known locations in display order. Anything else sorts alphabetically
/// after these.
pub const LOCATION_ORDER: [&str; 10] = [
    "Residential",
    "Commercial",
    "Old World",
    "Technological",
    "Medical",
    "Mechanical",
    "Industrial",
    "Electrical",
    "Arc",
    "Unknown",
];

/// One item the player should pick up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LootEntry {
    /// Catalog id.
    pub item_id: ItemId,
    /// English display name.
    pub name: String,
    /// Category tag.
    pub item_type: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Where the item can be found.
    pub found_in: Vec<String>,
    /// What to do with the item once found.
    pub action: Option<ItemAction>,
    /// Distinct goals served by this item.
    pub goal_count: usize,
    /// Display priority derived from `goal_count`.
    pub priority: Priority,
    /// Every recorded usage of the item.
    pub usages: Vec<UsageEntry>,
}

impl LootEntry {
    fn new(item: &Item, usages: &[UsageEntry], reverse_map: &ReverseUsageMap) -> Self {
        let goal_count = reverse_map.goal_count(item.id.as_str());
        Self {
            item_id: item.id.clone(),
            name: String::from(item.display_name()),
            item_type: item.item_type.clone(),
            rarity: item.rarity,
            found_in: item.found_in.clone(),
            action: classify(item.id.as_str(), reverse_map),
            goal_count,
            priority: Priority::from_goal_count(goal_count),
            usages: usages.to_vec(),
        }
    }
}

/// Build the loot list from a pruned reverse usage map.
///
/// Goal items (enabled or not), stashed items, unknown ids, and items that
/// are not lootable are left out. Entries are sorted by display name
/// ignoring case, then by exact name, then id.
pub fn build_loot_list(
    reverse_map: &ReverseUsageMap,
    catalog: &Catalog,
    goals: &[ItemId],
    active_stash: &BTreeSet<ItemId>,
) -> Vec<LootEntry> {
    let mut entries: Vec<LootEntry> = reverse_map
        .iter()
        .filter(|(id, _)| !goals.contains(*id) && !active_stash.contains(*id))
        .filter_map(|(id, usages)| {
            catalog
                .get(id.as_str())
                .filter(|item| item.is_lootable())
                .map(|item| LootEntry::new(item, usages, reverse_map))
        })
        .collect();
    entries.sort_by_cached_key(|e| (e.name.to_lowercase(), e.name.clone(), e.item_id.clone()));
    entries
}

/// Display filters over the loot list.
///
/// `None` for a set means every option is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootFilter {
    /// Case-insensitive substring of the display name. A blank term
    /// matches everything; otherwise the term is matched as typed.
    #[serde(default)]
    pub search: Option<String>,
    /// Enabled category tags.
    #[serde(default)]
    pub types: Option<BTreeSet<String>>,
    /// Enabled rarities.
    #[serde(default)]
    pub rarities: Option<BTreeSet<Rarity>>,
    /// Enabled locations. Items with no location always pass.
    #[serde(default)]
    pub locations: Option<BTreeSet<String>>,
}

impl LootFilter {
    /// Whether `entry` passes every filter.
    pub fn matches(&self, entry: &LootEntry) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
            .is_none_or(|term| entry.name.to_lowercase().contains(&term.to_lowercase()));
        let type_ok = self
            .types
            .as_ref()
            .is_none_or(|types| types.contains(&entry.item_type));
        let rarity_ok = self
            .rarities
            .as_ref()
            .is_none_or(|rarities| rarities.contains(&entry.rarity));
        let location_ok = entry.found_in.is_empty()
            || self.locations.as_ref().is_none_or(|locations| {
                entry.found_in.iter().any(|l| locations.contains(l))
            });
        search_ok && type_ok && rarity_ok && location_ok
    }

    /// Entries passing every filter, in list order.
    pub fn apply<'a>(&self, entries: &'a [LootEntry]) -> Vec<&'a LootEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Entry counts per filter option, over the unfiltered loot list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCounts {
    /// Entries per category tag.
    pub types: BTreeMap<String, usize>,
    /// Entries per rarity.
    pub rarities: BTreeMap<Rarity, usize>,
    /// Entries per location. An entry counts once for each location.
    pub locations: BTreeMap<String, usize>,
}

impl FacetCounts {
    /// Count entries per type, rarity, and location.
    pub fn from_entries(entries: &[LootEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            bump(counts.types.entry(entry.item_type.clone()).or_default());
            bump(counts.rarities.entry(entry.rarity).or_default());
            for location in &entry.found_in {
                bump(counts.locations.entry(location.clone()).or_default());
            }
        }
        counts
    }
}

fn bump(count: &mut usize) {
    *count = count.saturating_add(1);
}

/// Every filter option worth offering for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Category tags, alphabetical.
    pub types: Vec<String>,
    /// Rarities, lowest first.
    pub rarities: Vec<Rarity>,
    /// Locations in [`LOCATION_ORDER`], unknown locations alphabetically
    /// after.
    pub locations: Vec<String>,
}

/// Collect filter options from lootable catalog items that break down into
/// something or appear in some recipe.
pub fn filter_options(catalog: &Catalog) -> FilterOptions {
    let ingredients: BTreeSet<&ItemId> = catalog
        .items()
        .flat_map(|item| item.recipe_entries().map(|(id, _)| id))
        .collect();

    let mut types = BTreeSet::new();
    let mut rarities = BTreeSet::new();
    let mut locations = BTreeSet::new();
    for item in catalog
        .items()
        .filter(|item| item.is_lootable())
        .filter(|item| item.breaks_down() || ingredients.contains(&item.id))
    {
        types.insert(item.item_type.clone());
        rarities.insert(item.rarity);
        locations.extend(item.found_in.iter().cloned());
    }

    let mut locations: Vec<String> = locations.into_iter().collect();
    locations.sort_by_key(|location| location_rank(location));

    FilterOptions {
        types: types.into_iter().collect(),
        rarities: rarities.into_iter().collect(),
        locations,
    }
}

/// Sort key placing known locations first, in fixed order.
fn location_rank(location: &str) -> (usize, String) {
    let rank = LOCATION_ORDER
        .iter()
        .position(|known| *known == location)
        .unwrap_or(LOCATION_ORDER.len());
    (rank, location.to_owned())
}
