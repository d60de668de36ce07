//! The catalog item record.
//!
//! Items arrive from the catalog JSON with many optional fields. Rather than
//! scattering presence checks through the resolver, every "does this item
//! have X" question is answered by a named predicate on [`Item`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ItemKind, Rarity, SourceMethod};
use crate::ids::ItemId;

/// Type tag of raw materials that are only ever looted.
pub const BASIC_MATERIAL: &str = "Basic Material";

/// Type tag of weapon modifications.
pub const MODIFICATION: &str = "Modification";

/// A material requirement or yield table: material id to quantity.
///
/// Keeps the order the catalog lists materials in, which is the order
/// recipe ingredients are expanded and reported.
pub type MaterialMap = IndexMap<ItemId, u32>;

// ---------------------------------------------------------------------------
// LocalizedText
// ---------------------------------------------------------------------------

/// Text keyed by language code (`en`, `de`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    /// Return the text for a language code.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    /// Return the English text.
    pub fn en(&self) -> Option<&str> {
        self.get("en")
    }
}

impl From<&str> for LocalizedText {
    fn from(en: &str) -> Self {
        Self(BTreeMap::from([(String::from("en"), String::from(en))]))
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A single item record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Stable unique key.
    pub id: ItemId,
    /// Localized display name.
    pub name: LocalizedText,
    /// Localized flavor text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<LocalizedText>,
    /// Category tag, e.g. `Basic Material` or `Topside Material`.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Location categories where the item can be found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[ts(as = "Option<Vec<String>>", optional)]
    pub found_in: Vec<String>,
    /// Ingredients per craft. Presence makes the item craftable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub recipe: Option<MaterialMap>,
    /// Materials yielded by salvaging one of this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub salvages_into: Option<MaterialMap>,
    /// Materials yielded by recycling one of this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub recycles_into: Option<MaterialMap>,
    /// Materials to upgrade from the previous weapon tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub upgrade_cost: Option<MaterialMap>,
    /// Whether the item is a weapon.
    #[serde(default)]
    pub is_weapon: bool,
    /// Weapon tier (1 through 4) for tiered weapons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tier: Option<u8>,
    /// Trade value in coins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub value: Option<u32>,
    /// Weight of one unit in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub weight_kg: Option<Decimal>,
    /// Maximum stack size in one stash slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub stack_size: Option<u32>,
    /// Workbench the recipe is crafted at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub craft_bench: Option<String>,
    /// Workbench level required to craft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub station_level_required: Option<u32>,
    /// Whether crafting requires a blueprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub blueprint_locked: Option<bool>,
    /// Icon file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image_filename: Option<String>,
    /// When the record was last updated upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a minimal item with no recipe or breakdown tables.
    pub fn new(id: impl Into<ItemId>, name: &str, item_type: &str, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: LocalizedText::from(name),
            description: None,
            item_type: String::from(item_type),
            rarity,
            found_in: Vec::new(),
            recipe: None,
            salvages_into: None,
            recycles_into: None,
            upgrade_cost: None,
            is_weapon: false,
            tier: None,
            value: None,
            weight_kg: None,
            stack_size: None,
            craft_bench: None,
            station_level_required: None,
            blueprint_locked: None,
            image_filename: None,
            updated_at: None,
        }
    }

    /// English display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.en().unwrap_or_else(|| self.id.as_str())
    }

    /// Whether the item is a raw material that is only ever looted.
    pub fn is_basic_material(&self) -> bool {
        self.item_type == BASIC_MATERIAL
    }

    /// Whether the item is a weapon modification.
    pub fn is_modification(&self) -> bool {
        self.item_type == MODIFICATION
    }

    /// Whether the item belongs on a "what to loot" list.
    ///
    /// Basic materials, weapons, and modifications are excluded. The same
    /// rule decides whether an item may be suggested as a salvage or
    /// recycle source.
    pub fn is_lootable(&self) -> bool {
        !self.is_basic_material() && !self.is_weapon && !self.is_modification()
    }

    /// Whether the item has a non-empty recipe.
    pub fn has_recipe(&self) -> bool {
        self.recipe.as_ref().is_some_and(|recipe| !recipe.is_empty())
    }

    /// Iterate over recipe ingredients and their per-craft quantities.
    pub fn recipe_entries(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.recipe
            .iter()
            .flat_map(|recipe| recipe.iter().map(|(id, qty)| (id, *qty)))
    }

    /// Quantity of `material` yielded by salvaging, if any.
    pub fn salvage_yield(&self, material: &str) -> Option<u32> {
        positive_entry(self.salvages_into.as_ref(), material)
    }

    /// Quantity of `material` yielded by recycling, if any.
    pub fn recycle_yield(&self, material: &str) -> Option<u32> {
        positive_entry(self.recycles_into.as_ref(), material)
    }

    /// The preferred way to obtain `material` by breaking this item down.
    ///
    /// Salvage wins when both methods yield the material.
    pub fn breakdown_method_for(&self, material: &str) -> Option<SourceMethod> {
        if self.salvage_yield(material).is_some() {
            Some(SourceMethod::Salvage)
        } else if self.recycle_yield(material).is_some() {
            Some(SourceMethod::Recycle)
        } else {
            None
        }
    }

    /// Whether salvaging or recycling this item yields anything.
    pub fn breaks_down(&self) -> bool {
        let non_empty = |map: Option<&MaterialMap>| map.is_some_and(|m| !m.is_empty());
        non_empty(self.salvages_into.as_ref()) || non_empty(self.recycles_into.as_ref())
    }

    /// Derive the coarse [`ItemKind`] of this item.
    pub fn kind(&self) -> ItemKind {
        if self.is_weapon {
            ItemKind::Weapon
        } else if self.is_modification() {
            ItemKind::Modification
        } else if self.is_basic_material() {
            ItemKind::BasicMaterial
        } else if self.has_recipe() {
            ItemKind::Craftable
        } else {
            ItemKind::Loot
        }
    }
}

/// Look up a material in an optional table, treating zero as absent.
fn positive_entry(map: Option<&MaterialMap>, material: &str) -> Option<u32> {
    map.and_then(|m| m.get(material))
        .copied()
        .filter(|qty| *qty > 0)
}
