//! Enumeration types for Lootplan.
//!
//! Covers item rarity, the three usage relationships recorded in the reverse
//! usage map, the two breakdown methods, the recommended action per item,
//! and the derived item kind.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Item rarity tier.
///
/// Declaration order is the display order, so the derived [`Ord`] sorts
/// from `Common` up to `Legendary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Most frequently found.
    Common,
    /// Slightly less frequent than common.
    Uncommon,
    /// Found in dedicated containers or from tougher enemies.
    Rare,
    /// Uncommon drops from high-value containers.
    Epic,
    /// The rarest tier.
    Legendary,
}

impl Rarity {
    /// All rarities in display order.
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// Return the catalog spelling of this rarity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }

    /// Parse a rarity name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl core::fmt::Display for Rarity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Breakdown methods and usage relationships
// ---------------------------------------------------------------------------

/// How a source item is broken down to yield a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SourceMethod {
    /// Salvaged in the field.
    Salvage,
    /// Recycled at a workbench.
    Recycle,
}

/// Why a material appears in another item's usage list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Relationship {
    /// The item is a direct recipe ingredient of the parent.
    Recipe,
    /// Salvaging the item yields the parent material.
    Salvage,
    /// Recycling the item yields the parent material.
    Recycle,
}

impl From<SourceMethod> for Relationship {
    fn from(method: SourceMethod) -> Self {
        match method {
            SourceMethod::Salvage => Self::Salvage,
            SourceMethod::Recycle => Self::Recycle,
        }
    }
}

impl core::fmt::Display for Relationship {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Recipe => "recipe",
            Self::Salvage => "salvage",
            Self::Recycle => "recycle",
        })
    }
}

// ---------------------------------------------------------------------------
// Recommended action
// ---------------------------------------------------------------------------

/// The single recommended action for a looted item.
///
/// Items with no usages have no action; resolvers return
/// `Option<ItemAction>` and use `None` for that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ItemAction {
    /// Needed intact by at least one recipe.
    Keep,
    /// Break it down by salvaging.
    Salvage,
    /// Break it down by recycling.
    Recycle,
}

impl core::fmt::Display for ItemAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Salvage => "salvage",
            Self::Recycle => "recycle",
        })
    }
}

// ---------------------------------------------------------------------------
// Derived classifications
// ---------------------------------------------------------------------------

/// Coarse classification of a catalog item, derived from its type tag,
/// weapon flag, and recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// A weapon. Never suggested as a breakdown source or shown as loot.
    Weapon,
    /// A weapon modification. Treated like a weapon for loot purposes.
    Modification,
    /// A raw material that is only ever looted.
    BasicMaterial,
    /// Anything else with a recipe.
    Craftable,
    /// Anything else: found in the world and possibly broken down.
    Loot,
}

/// How urgently a loot entry should be collected, by goal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Priority {
    /// Supports fewer than two goals.
    Normal,
    /// Supports two or three goals.
    Medium,
    /// Supports four or more goals.
    High,
}

impl Priority {
    /// Map a distinct-goal count to a priority.
    pub const fn from_goal_count(goal_count: usize) -> Self {
        if goal_count >= 4 {
            Self::High
        } else if goal_count >= 2 {
            Self::Medium
        } else {
            Self::Normal
        }
    }
}
