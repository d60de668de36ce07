//! Reverse usage index.
//!
//! Inverts a set of crafting trees into "item -> who uses it" records. Two
//! kinds of usage are recorded:
//!
//! - **Recipe**: a tree node is used by its parent node, at the node's
//!   multiplied quantity.
//! - **Salvage / Recycle**: an item that appears nowhere in the trees can be
//!   broken down into a node's material. These are recorded at quantity 1;
//!   a single item is enough to start the chain.
//!
//! Entries are merged by `(parent, relationship)`; the largest quantity
//! wins and goal lists are unioned in first-seen order. Items in the active
//! stash never become keys. After construction the map is pruned of
//! entries whose every parent is stashed (see [`ReverseUsageMap::prune_orphans`]).

use std::collections::{BTreeMap, BTreeSet};

use lootplan_types::{CraftingTree, ItemId, Relationship, UsageEntry};
use serde::Serialize;
use tracing::debug;

/// Mapping from item id to every usage of that item across the goal trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReverseUsageMap {
    entries: BTreeMap<ItemId, Vec<UsageEntry>>,
}

impl ReverseUsageMap {
    /// Usages recorded for `item_id`.
    pub fn get(&self, item_id: &str) -> Option<&[UsageEntry]> {
        self.entries.get(item_id).map(Vec::as_slice)
    }

    /// Whether `item_id` has any recorded usage.
    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    /// Number of keyed items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no item has a recorded usage.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keyed items in id order.
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.entries.keys()
    }

    /// Iterate over `(item, usages)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &[UsageEntry])> {
        self.entries.iter().map(|(id, usages)| (id, usages.as_slice()))
    }

    /// Number of distinct goals across all usages of `item_id`.
    pub fn goal_count(&self, item_id: &str) -> usize {
        self.get(item_id)
            .unwrap_or_default()
            .iter()
            .flat_map(|usage| usage.goal_item_ids.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Record a usage, merging with an existing `(parent, relationship)`
    /// entry for the same item. Stashed items are skipped.
    fn record(
        &mut self,
        item_id: &ItemId,
        usage: Usage<'_>,
        goal: &ItemId,
        active_stash: &BTreeSet<ItemId>,
    ) {
        if active_stash.contains(item_id) {
            return;
        }
        let usages = self.entries.entry(item_id.clone()).or_default();
        match usages.iter_mut().find(|existing| {
            existing.parent_item_id == *usage.parent && existing.relationship == usage.relationship
        }) {
            Some(existing) => {
                existing.quantity = existing.quantity.max(usage.quantity);
                if !existing.goal_item_ids.contains(goal) {
                    existing.goal_item_ids.push(goal.clone());
                }
            }
            None => usages.push(UsageEntry {
                parent_item_id: usage.parent.clone(),
                quantity: usage.quantity,
                relationship: usage.relationship,
                goal_item_ids: vec![goal.clone()],
            }),
        }
    }

    /// Remove every entry whose parents are all unavailable, repeating
    /// until nothing changes. Returns the number of items removed.
    ///
    /// A parent is unavailable when it is in the active stash, or when it
    /// was itself removed in an earlier round and is not one of `goals`.
    /// Entries with no usages are never removed.
    pub fn prune_orphans(
        &mut self,
        active_stash: &BTreeSet<ItemId>,
        goals: &BTreeSet<ItemId>,
    ) -> usize {
        let mut removed: BTreeSet<ItemId> = BTreeSet::new();
        loop {
            let orphaned: Vec<ItemId> = self
                .entries
                .iter()
                .filter(|(_, usages)| {
                    !usages.is_empty()
                        && usages.iter().all(|usage| {
                            let parent = &usage.parent_item_id;
                            active_stash.contains(parent)
                                || (removed.contains(parent) && !goals.contains(parent))
                        })
                })
                .map(|(id, _)| id.clone())
                .collect();

            if orphaned.is_empty() {
                break;
            }
            for id in orphaned {
                self.entries.remove(&id);
                removed.insert(id);
            }
        }
        if !removed.is_empty() {
            debug!(removed = removed.len(), "pruned orphaned usages");
        }
        removed.len()
    }
}

/// The parent side of one recorded usage.
#[derive(Clone, Copy)]
struct Usage<'a> {
    parent: &'a ItemId,
    quantity: u32,
    relationship: Relationship,
}

/// Build the pruned reverse usage map for a set of goal trees.
pub fn build_reverse_map(
    trees: &[CraftingTree],
    active_stash: &BTreeSet<ItemId>,
) -> ReverseUsageMap {
    let mut in_trees: BTreeSet<&ItemId> = BTreeSet::new();
    for tree in trees {
        tree.root.walk(&mut |node, _| {
            in_trees.insert(&node.item_id);
        });
    }

    let mut map = ReverseUsageMap::default();
    for tree in trees {
        let goal = &tree.goal_item_id;
        tree.root.walk(&mut |node, parent| {
            if let Some(parent) = parent {
                let usage = Usage {
                    parent: &parent.item_id,
                    quantity: node.quantity,
                    relationship: Relationship::Recipe,
                };
                map.record(&node.item_id, usage, goal, active_stash);
            }
            for source in &node.salvageable_from {
                if in_trees.contains(&source.item_id) {
                    continue;
                }
                let usage = Usage {
                    parent: &node.item_id,
                    quantity: 1,
                    relationship: source.method.into(),
                };
                map.record(&source.item_id, usage, goal, active_stash);
            }
        });
    }

    let goals: BTreeSet<ItemId> = trees.iter().map(|t| t.goal_item_id.clone()).collect();
    map.prune_orphans(active_stash, &goals);
    debug!(items = map.len(), trees = trees.len(), "built reverse usage map");
    map
}
