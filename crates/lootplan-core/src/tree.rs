//! Crafting tree expansion.
//!
//! A goal item is expanded recursively through its recipe into a
//! [`CraftingTree`]. Expansion stops at items the player already holds
//! (the active stash), at items missing from the catalog, and at the depth
//! limit. Every ingredient node is annotated with the items that can be
//! broken down into it.
//!
//! Cycle protection uses a set of `(item, depth)` pairs shared across the
//! whole build of one tree. A pair seen a second time becomes a leaf, so a
//! circular recipe unrolls at most `max_depth + 1` levels.

use std::collections::{BTreeMap, BTreeSet};

use lootplan_catalog::Catalog;
use lootplan_types::{CraftingNode, CraftingTree, ItemId, SalvageSource};
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_DEPTH;

/// Expands goal items into crafting trees against a fixed catalog, goal
/// list, and active stash.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    catalog: &'a Catalog,
    goal_ids: &'a [ItemId],
    active_stash: &'a BTreeSet<ItemId>,
    max_depth: u32,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder with the default depth limit.
    ///
    /// `goal_ids` and `active_stash` are never offered as salvage sources.
    pub const fn new(
        catalog: &'a Catalog,
        goal_ids: &'a [ItemId],
        active_stash: &'a BTreeSet<ItemId>,
    ) -> Self {
        Self {
            catalog,
            goal_ids,
            active_stash,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the depth limit. The root sits at depth 0.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand `goal` at quantity 1.
    pub fn build(&self, goal: &ItemId) -> CraftingTree {
        let mut visited = BTreeSet::new();
        let root = self.expand(goal, 1, 0, &mut visited);
        debug!(
            goal = %goal,
            height = root.height(),
            "built crafting tree"
        );
        CraftingTree {
            goal_item_id: goal.clone(),
            root,
        }
    }

    fn expand(
        &self,
        item_id: &ItemId,
        quantity: u32,
        depth: u32,
        visited: &mut BTreeSet<(ItemId, u32)>,
    ) -> CraftingNode {
        let mut node = CraftingNode::leaf(item_id.clone(), quantity);

        let Some(item) = self.catalog.get(item_id.as_str()) else {
            warn!(item_id = %item_id, depth, "recipe references unknown item");
            return node;
        };

        if self.active_stash.contains(item_id) {
            return node;
        }

        if depth > self.max_depth || !visited.insert((item_id.clone(), depth)) {
            debug!(item_id = %item_id, depth, "stopped expanding crafting tree");
            return node;
        }

        let next_depth = depth.saturating_add(1);
        for (ingredient, per_craft) in item.recipe_entries() {
            let mut child = self.expand(
                ingredient,
                per_craft.saturating_mul(quantity),
                next_depth,
                visited,
            );
            child.salvageable_from = self.salvage_sources(ingredient);
            node.children.push(child);
        }
        node
    }

    /// Breakdown sources for `material`, minus goals and stashed items.
    fn salvage_sources(&self, material: &ItemId) -> Vec<SalvageSource> {
        self.catalog
            .breakdown_sources(material.as_str())
            .iter()
            .filter(|source| {
                !self.goal_ids.contains(&source.item_id)
                    && !self.active_stash.contains(&source.item_id)
            })
            .cloned()
            .collect()
    }
}

/// Build the crafting tree for one goal with the default depth limit.
pub fn build_crafting_tree(
    goal: &ItemId,
    catalog: &Catalog,
    goal_ids: &[ItemId],
    active_stash: &BTreeSet<ItemId>,
) -> CraftingTree {
    TreeBuilder::new(catalog, goal_ids, active_stash).build(goal)
}

/// Total quantity of each leaf material in a tree.
///
/// Leaves are items that are not expanded further: raw materials, stashed
/// items, unknown items, and nodes cut off by the depth limit.
pub fn flatten_tree(tree: &CraftingTree) -> BTreeMap<ItemId, u32> {
    let mut totals = BTreeMap::new();
    accumulate_leaves(&tree.root, &mut totals);
    totals
}

/// Leaf material totals summed across several trees.
pub fn combine_trees(trees: &[CraftingTree]) -> BTreeMap<ItemId, u32> {
    let mut totals = BTreeMap::new();
    for tree in trees {
        accumulate_leaves(&tree.root, &mut totals);
    }
    totals
}

fn accumulate_leaves(root: &CraftingNode, totals: &mut BTreeMap<ItemId, u32>) {
    root.walk(&mut |node, _| {
        if node.is_leaf() {
            let total: &mut u32 = totals.entry(node.item_id.clone()).or_default();
            *total = total.saturating_add(node.quantity);
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lootplan_types::{Item, MaterialMap, Rarity, SourceMethod};

    use super::*;

    fn recipe(entries: &[(&str, u32)]) -> Option<MaterialMap> {
        Some(
            entries
                .iter()
                .map(|(id, qty)| (ItemId::from(*id), *qty))
                .collect(),
        )
    }

    fn material(id: &str) -> Item {
        Item::new(id, id, "Topside Material", Rarity::Common)
    }

    fn crafted(id: &str, entries: &[(&str, u32)]) -> Item {
        let mut item = Item::new(id, id, "Quick Use", Rarity::Uncommon);
        item.recipe = recipe(entries);
        item
    }

    fn catalog(items: Vec<Item>) -> Catalog {
        Catalog::from_items(items).unwrap()
    }

    #[test]
    fn multiplies_quantities_down_the_tree() {
        let catalog = catalog(vec![
            crafted("shield", &[("rod", 2)]),
            crafted("rod", &[("wires", 3)]),
            material("wires"),
        ]);
        let goals = [ItemId::from("shield")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

        assert_eq!(tree.root.quantity, 1);
        let rod = tree.root.child("rod");
        assert_eq!(rod.map(|n| n.quantity), Some(2));
        let wires = rod.and_then(|n| n.child("wires"));
        assert_eq!(wires.map(|n| n.quantity), Some(6));
        assert!(wires.is_some_and(CraftingNode::is_leaf));
    }

    #[test]
    fn children_follow_recipe_order() {
        let catalog = catalog(vec![
            crafted("kit", &[("zeta", 1), ("alpha", 2), ("mid", 1)]),
            material("alpha"),
            material("mid"),
            material("zeta"),
        ]);
        let goals = [ItemId::from("kit")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

        let order: Vec<&str> = tree.root.children.iter().map(|c| c.item_id.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn stashed_item_is_not_expanded() {
        let catalog = catalog(vec![
            crafted("shield", &[("rod", 1)]),
            crafted("rod", &[("wires", 3)]),
            material("wires"),
        ]);
        let goals = [ItemId::from("shield")];
        let stash = BTreeSet::from([ItemId::from("rod")]);
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &stash);

        let rod = tree.root.child("rod");
        assert!(rod.is_some_and(CraftingNode::is_leaf));
    }

    #[test]
    fn unknown_ingredient_becomes_leaf() {
        let catalog = catalog(vec![crafted("shield", &[("mystery", 2)])]);
        let goals = [ItemId::from("shield")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

        let mystery = tree.root.child("mystery");
        assert_eq!(mystery.map(|n| n.quantity), Some(2));
        assert!(mystery.is_some_and(CraftingNode::is_leaf));
    }

    #[test]
    fn unknown_goal_is_single_leaf() {
        let catalog = catalog(vec![material("wires")]);
        let goals = [ItemId::from("ghost")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());
        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.quantity, 1);
    }

    #[test]
    fn circular_recipe_terminates() {
        let catalog = catalog(vec![crafted("a", &[("b", 1)]), crafted("b", &[("a", 1)])]);
        let goals = [ItemId::from("a")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

        // Depths 0..=10 expand, the node at depth 11 is a leaf.
        assert_eq!(tree.root.height(), 11);
    }

    #[test]
    fn custom_depth_limit_truncates() {
        let catalog = catalog(vec![crafted("a", &[("b", 1)]), crafted("b", &[("a", 1)])]);
        let goals = [ItemId::from("a")];
        let stash = BTreeSet::new();
        let tree = TreeBuilder::new(&catalog, &goals, &stash)
            .with_max_depth(2)
            .build(&goals[0]);
        assert_eq!(tree.root.height(), 3);
    }

    #[test]
    fn repeated_item_at_same_depth_expands_once() {
        let catalog = catalog(vec![
            crafted("kit", &[("left", 1), ("right", 1)]),
            crafted("left", &[("gear", 1)]),
            crafted("right", &[("gear", 1)]),
            crafted("gear", &[("wires", 1)]),
            material("wires"),
        ]);
        let goals = [ItemId::from("kit")];
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

        let left_gear = tree.root.child("left").and_then(|n| n.child("gear"));
        let right_gear = tree.root.child("right").and_then(|n| n.child("gear"));
        assert!(left_gear.is_some_and(|n| !n.is_leaf()));
        assert!(right_gear.is_some_and(CraftingNode::is_leaf));
    }

    #[test]
    fn annotates_salvage_sources_excluding_goals_and_stash() {
        let mut taser = Item::new("taser", "Taser", "Recyclable", Rarity::Common);
        taser.salvages_into = recipe(&[("wires", 2)]);
        let mut radio = Item::new("radio", "Radio", "Recyclable", Rarity::Common);
        radio.recycles_into = recipe(&[("wires", 1)]);
        let mut lamp = Item::new("lamp", "Lamp", "Recyclable", Rarity::Common);
        lamp.salvages_into = recipe(&[("wires", 1)]);

        let catalog = catalog(vec![
            crafted("shield", &[("wires", 1)]),
            material("wires"),
            taser,
            radio,
            lamp,
        ]);
        let goals = [ItemId::from("shield"), ItemId::from("lamp")];
        let stash = BTreeSet::from([ItemId::from("radio")]);
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &stash);

        let wires = tree.root.child("wires").unwrap();
        assert_eq!(
            wires.salvageable_from,
            vec![SalvageSource {
                item_id: ItemId::from("taser"),
                method: SourceMethod::Salvage,
            }]
        );
        assert!(tree.root.salvageable_from.is_empty());
    }

    #[test]
    fn flatten_sums_leaves() {
        let catalog = catalog(vec![
            crafted("shield", &[("rod", 2), ("wires", 1)]),
            crafted("rod", &[("wires", 3)]),
            material("wires"),
        ]);
        let goals = [ItemId::from("shield")];
        let stash = BTreeSet::new();
        let tree = build_crafting_tree(&goals[0], &catalog, &goals, &stash);

        let totals = flatten_tree(&tree);
        assert_eq!(totals.get("wires").copied(), Some(7));
        assert!(!totals.contains_key("rod"));

        let combined = combine_trees(&[tree.clone(), tree]);
        assert_eq!(combined.get("wires").copied(), Some(14));
    }
}
