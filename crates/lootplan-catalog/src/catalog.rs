//! The immutable item catalog.
//!
//! [`Catalog`] maps item ids to item records. Construction consolidates
//! weapon tiers and builds a reverse index from each material to the items
//! that can be salvaged or recycled into it, so the tree builder does not
//! rescan the whole catalog for every ingredient.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use lootplan_types::{Item, ItemId, SalvageSource};

use crate::error::CatalogError;
use crate::tiers::{UpgradeStep, consolidate_weapon_tiers, upgrade_steps};

/// Read-only id → item map for one planning session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Consolidated items indexed by id, in catalog order.
    items: IndexMap<ItemId, Item>,
    /// Original tier records, keyed by the consolidated weapon id.
    tier_variants: BTreeMap<ItemId, Vec<Item>>,
    /// Material id -> items that break down into it, salvage preferred.
    breakdown_sources: BTreeMap<ItemId, Vec<SalvageSource>>,
}

impl Catalog {
    /// Build a catalog from raw item records.
    ///
    /// Weapon tiers are consolidated before indexing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`] if two records share an id.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }

        let raw_count = items.len();
        let (consolidated, tier_variants) = consolidate_weapon_tiers(items);
        let items: IndexMap<ItemId, Item> = consolidated
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        let breakdown_sources = index_breakdown_sources(&items);

        info!(
            raw_items = raw_count,
            items = items.len(),
            weapon_families = tier_variants.len(),
            breakdown_targets = breakdown_sources.len(),
            "catalog loaded"
        );

        Ok(Self {
            items,
            tier_variants,
            breakdown_sources,
        })
    }

    /// Parse a catalog from JSON.
    ///
    /// Accepts either an array of item records or an object whose values are
    /// item records (keys are ignored in favour of each record's `id`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed JSON or records,
    /// [`CatalogError::UnexpectedShape`] for other top-level values, and
    /// [`CatalogError::DuplicateItem`] for repeated ids.
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let items: Vec<Item> = match document {
            serde_json::Value::Array(records) => records
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<_, _>>()?,
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(_, record)| serde_json::from_value(record))
                .collect::<Result<_, _>>()?,
            other => {
                return Err(CatalogError::UnexpectedShape {
                    found: json_type_name(&other),
                });
            }
        };
        Self::from_items(items)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, plus any
    /// error from [`Catalog::parse`].
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        debug!(path = %path.display(), "reading catalog");
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Get an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Whether an item with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Number of (consolidated) items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all items in catalog order.
    ///
    /// Consolidated weapon families follow every other item.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Iterate over all item ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    /// English display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, Item::display_name)
    }

    // -------------------------------------------------------------------
    // Breakdown sources
    // -------------------------------------------------------------------

    /// Items that can be salvaged or recycled into `material`.
    ///
    /// Only lootable items (not basic materials, weapons, or modifications)
    /// are ever listed. Basic material targets have no sources: raw
    /// materials are looted, not produced. The list is in catalog order.
    pub fn breakdown_sources(&self, material: &str) -> &[SalvageSource] {
        if self.get(material).is_some_and(Item::is_basic_material) {
            return &[];
        }
        self.breakdown_sources
            .get(material)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // -------------------------------------------------------------------
    // Weapon tiers
    // -------------------------------------------------------------------

    /// Per-tier material steps for building `id`.
    ///
    /// A consolidated weapon yields its tier I recipe followed by each
    /// tier's upgrade cost. Any other craftable item yields one tier 1 step
    /// with its recipe. Everything else yields no steps.
    pub fn upgrade_breakdown(&self, id: &str) -> Vec<UpgradeStep> {
        if let Some(tiers) = self.tier_variants.get(id) {
            return upgrade_steps(tiers);
        }
        self.get(id)
            .filter(|item| item.has_recipe())
            .and_then(|item| {
                item.recipe.as_ref().map(|recipe| UpgradeStep {
                    tier: 1,
                    item_id: item.id.clone(),
                    item_name: String::from(item.display_name()),
                    materials: recipe.clone(),
                })
            })
            .into_iter()
            .collect()
    }

    /// Whether `id` is a consolidated tiered weapon.
    pub fn is_tiered_weapon(&self, id: &str) -> bool {
        self.tier_variants.contains_key(id)
    }
}

/// Build the material -> breakdown source index.
fn index_breakdown_sources(items: &IndexMap<ItemId, Item>) -> BTreeMap<ItemId, Vec<SalvageSource>> {
    let mut index: BTreeMap<ItemId, Vec<SalvageSource>> = BTreeMap::new();
    for source in items.values().filter(|item| item.is_lootable()) {
        let materials: BTreeSet<&ItemId> = source
            .salvages_into
            .iter()
            .chain(source.recycles_into.iter())
            .flat_map(|table| table.keys())
            .collect();

        for material in materials {
            if let Some(method) = source.breakdown_method_for(material.as_str()) {
                index.entry(material.clone()).or_default().push(SalvageSource {
                    item_id: source.id.clone(),
                    method,
                });
            }
        }
    }
    index
}

/// Human-readable name of a JSON value's type.
const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
