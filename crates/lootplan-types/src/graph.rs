//! Crafting trees and the usage records derived from them.
//!
//! A [`CraftingTree`] is owned top-down: each [`CraftingNode`] owns its
//! children and holds no reference to its parent. Parent relationships are
//! derived data, recorded as [`UsageEntry`] values in the reverse usage map.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Relationship, SourceMethod};
use crate::ids::ItemId;

// ---------------------------------------------------------------------------
// SalvageSource
// ---------------------------------------------------------------------------

/// An item that can be broken down to obtain a node's material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SalvageSource {
    /// The item to break down.
    pub item_id: ItemId,
    /// How to break it down.
    pub method: SourceMethod,
}

// ---------------------------------------------------------------------------
// CraftingNode / CraftingTree
// ---------------------------------------------------------------------------

/// One position in a crafting tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CraftingNode {
    /// The item needed at this position.
    pub item_id: ItemId,
    /// Total quantity needed here: the parent's recipe quantity times the
    /// parent node's own quantity.
    pub quantity: u32,
    /// Ingredients, in recipe order. Empty for leaves.
    #[serde(default)]
    pub children: Vec<CraftingNode>,
    /// Items that can be salvaged or recycled into this node's material.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[ts(as = "Option<Vec<SalvageSource>>", optional)]
    pub salvageable_from: Vec<SalvageSource>,
}

impl CraftingNode {
    /// Create a childless node.
    pub const fn leaf(item_id: ItemId, quantity: u32) -> Self {
        Self {
            item_id,
            quantity,
            children: Vec::new(),
            salvageable_from: Vec::new(),
        }
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Return the first direct child for `item_id`.
    pub fn child(&self, item_id: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.item_id.as_str() == item_id)
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height().saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Visit this node and every descendant in depth-first pre-order.
    ///
    /// The callback receives each node together with its parent (`None` for
    /// the node this method is called on).
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Self, Option<&'a Self>),
    {
        self.walk_from(None, visit);
    }

    fn walk_from<'a, F>(&'a self, parent: Option<&'a Self>, visit: &mut F)
    where
        F: FnMut(&'a Self, Option<&'a Self>),
    {
        visit(self, parent);
        for child in &self.children {
            child.walk_from(Some(self), visit);
        }
    }
}

/// The expanded crafting tree for one goal item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CraftingTree {
    /// The goal this tree was built for.
    pub goal_item_id: ItemId,
    /// Root node, for the goal item at quantity 1.
    pub root: CraftingNode,
}

// ---------------------------------------------------------------------------
// UsageEntry
// ---------------------------------------------------------------------------

/// One way an item is used by a parent item, and for which goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UsageEntry {
    /// The item that needs (or is produced from) this item.
    pub parent_item_id: ItemId,
    /// Largest requirement seen across contributing goals.
    pub quantity: u32,
    /// How the item relates to the parent.
    pub relationship: Relationship,
    /// Goals this usage contributes to, in first-seen order.
    pub goal_item_ids: Vec<ItemId>,
}
