//! End-to-end resolver tests against a small item catalog on disk.

// Test code panics on failure by design.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use std::collections::BTreeSet;
use std::path::Path;

use lootplan_catalog::Catalog;
use lootplan_core::{
    LootFilter, LootPlanner, ResolverConfig, TreeBuilder, active_stash, build_crafting_tree,
    build_reverse_map, classify,
};
use lootplan_types::{
    CraftingNode, CraftingTree, ItemAction, ItemId, Priority, Rarity, Relationship, Selections,
    SourceMethod,
};

fn catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("items.json");
    Catalog::from_file(&path).expect("fixture catalog loads")
}

fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId::from).collect()
}

fn set(raw: &[&str]) -> BTreeSet<ItemId> {
    raw.iter().copied().map(ItemId::from).collect()
}

fn trees(catalog: &Catalog, goals: &[ItemId], stash: &BTreeSet<ItemId>) -> Vec<CraftingTree> {
    goals
        .iter()
        .map(|goal| build_crafting_tree(goal, catalog, goals, stash))
        .collect()
}

fn collect_nodes(tree: &CraftingTree) -> Vec<(&CraftingNode, Option<&CraftingNode>)> {
    let mut nodes = Vec::new();
    tree.root.walk(&mut |node, parent| nodes.push((node, parent)));
    nodes
}

// =============================================================================
// Tree Builder
// =============================================================================

#[test]
fn child_quantity_is_recipe_quantity_times_parent_quantity() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield", "raider_hatch_key"]);
    for tree in trees(&catalog, &goals, &BTreeSet::new()) {
        for (node, parent) in collect_nodes(&tree) {
            let Some(parent) = parent else { continue };
            let per_craft = catalog
                .get(parent.item_id.as_str())
                .and_then(|item| item.recipe.as_ref())
                .and_then(|recipe| recipe.get(node.item_id.as_str()).copied())
                .unwrap();
            assert_eq!(node.quantity, per_craft * parent.quantity, "{}", node.item_id);
        }
    }
}

#[test]
fn heavy_shield_scenario() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield"]);
    let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

    assert_eq!(tree.root.children.len(), 2);
    let power_rod = tree.root.child("power_rod").unwrap();
    assert_eq!(power_rod.quantity, 1);
    let components = power_rod.child("advanced_electrical_components").unwrap();
    assert_eq!(components.quantity, 2);
    assert_eq!(components.child("wires").unwrap().quantity, 2);
    assert_eq!(tree.root.child("voltage_converter").unwrap().quantity, 2);
}

#[test]
fn stashed_item_node_has_no_children() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield"]);
    let stash = set(&["power_rod"]);
    let tree = build_crafting_tree(&goals[0], &catalog, &goals, &stash);

    let power_rod = tree.root.child("power_rod").unwrap();
    assert!(power_rod.children.is_empty());
}

#[test]
fn wires_lists_breakdown_sources_but_never_modifications() {
    let catalog = catalog();
    let goals = ids(&["raider_hatch_key"]);
    let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

    let wires = tree.root.child("wires").unwrap();
    let sources: Vec<(&str, SourceMethod)> = wires
        .salvageable_from
        .iter()
        .map(|s| (s.item_id.as_str(), s.method))
        .collect();
    assert_eq!(
        sources,
        vec![
            ("broken_handheld_radio", SourceMethod::Recycle),
            ("broken_taser", SourceMethod::Salvage),
        ]
    );
    // Basic material targets are loot-only.
    let tools = tree.root.child("rusted_tools").unwrap();
    assert!(tools.salvageable_from.is_empty());
}

#[test]
fn circular_recipe_terminates_at_depth_limit() {
    let catalog = Catalog::parse(
        r#"[
            { "id": "item_a", "name": { "en": "Item A" }, "type": "Quick Use", "rarity": "Common",
              "recipe": { "item_b": 1 } },
            { "id": "item_b", "name": { "en": "Item B" }, "type": "Quick Use", "rarity": "Common",
              "recipe": { "item_a": 1 } }
        ]"#,
    )
    .unwrap();
    let goals = ids(&["item_a"]);
    let stash = BTreeSet::new();

    let tree = build_crafting_tree(&goals[0], &catalog, &goals, &stash);
    assert_eq!(tree.root.height(), 11);

    let shallow = TreeBuilder::new(&catalog, &goals, &stash)
        .with_max_depth(4)
        .build(&goals[0]);
    assert_eq!(shallow.root.height(), 5);
}

#[test]
fn consolidated_weapon_expands_summed_recipe() {
    let catalog = catalog();
    let goals = ids(&["kettle_iv"]);
    let tree = build_crafting_tree(&goals[0], &catalog, &goals, &BTreeSet::new());

    assert_eq!(tree.root.child("metal_parts").unwrap().quantity, 24);
    assert_eq!(tree.root.child("sensor").unwrap().quantity, 3);
    assert_eq!(tree.root.child("wires").unwrap().quantity, 1);

    let steps = catalog.upgrade_breakdown("kettle_iv");
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0].tier, 1);
    assert_eq!(steps[3].materials.get("sensor").copied(), Some(2));
}

// =============================================================================
// Reverse Usage Map
// =============================================================================

#[test]
fn single_goal_map_contains_every_non_root_tree_item() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield"]);
    let trees = trees(&catalog, &goals, &BTreeSet::new());
    let map = build_reverse_map(&trees, &BTreeSet::new());

    for (node, parent) in collect_nodes(&trees[0]) {
        if parent.is_some() {
            assert!(map.contains(node.item_id.as_str()), "{}", node.item_id);
        }
    }
}

#[test]
fn shared_ingredient_collects_both_goals() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield", "power_rod"]);
    let trees = trees(&catalog, &goals, &BTreeSet::new());
    let map = build_reverse_map(&trees, &BTreeSet::new());

    let usage = map
        .get("arc_circuitry")
        .unwrap()
        .iter()
        .find(|u| u.parent_item_id.as_str() == "power_rod")
        .unwrap();
    assert_eq!(usage.relationship, Relationship::Recipe);
    assert_eq!(usage.goal_item_ids, ids(&["heavy_shield", "power_rod"]));
    assert_eq!(usage.quantity, 2);
}

#[test]
fn tree_and_usages_follow_catalog_recipe_order() {
    let catalog = Catalog::parse(
        r#"[
            { "id": "kit", "name": { "en": "Kit" }, "type": "Quick Use", "rarity": "Common",
              "recipe": { "zeta": 1, "alpha": 1 } },
            { "id": "zeta", "name": { "en": "Zeta" }, "type": "Topside Material", "rarity": "Common",
              "recipe": { "wires": 1 } },
            { "id": "alpha", "name": { "en": "Alpha" }, "type": "Topside Material", "rarity": "Common",
              "recipe": { "wires": 2 } },
            { "id": "wires", "name": { "en": "Wires" }, "type": "Topside Material", "rarity": "Common" }
        ]"#,
    )
    .unwrap();
    let goals = ids(&["kit"]);
    let trees = trees(&catalog, &goals, &BTreeSet::new());

    let children: Vec<&str> = trees[0].root.children.iter().map(|c| c.item_id.as_str()).collect();
    assert_eq!(children, vec!["zeta", "alpha"]);

    let map = build_reverse_map(&trees, &BTreeSet::new());
    let parents: Vec<&str> = map
        .get("wires")
        .unwrap()
        .iter()
        .map(|u| u.parent_item_id.as_str())
        .collect();
    assert_eq!(parents, vec!["zeta", "alpha"]);
}

#[test]
fn unreferenced_radio_is_salvage_source_for_sensor() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield"]);
    let trees = trees(&catalog, &goals, &BTreeSet::new());
    let map = build_reverse_map(&trees, &BTreeSet::new());

    let radio = map.get("broken_handheld_radio").unwrap();
    let salvage = radio
        .iter()
        .find(|u| u.relationship == Relationship::Salvage)
        .unwrap();
    assert_eq!(salvage.parent_item_id.as_str(), "sensor");
    assert_eq!(salvage.quantity, 1);
    assert_eq!(salvage.goal_item_ids, ids(&["heavy_shield"]));
}

#[test]
fn stashing_never_grows_the_key_set() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield", "raider_hatch_key"]);
    let unstashed = build_reverse_map(&trees(&catalog, &goals, &BTreeSet::new()), &BTreeSet::new());
    let all_keys: BTreeSet<&ItemId> = unstashed.item_ids().collect();

    for stashed in unstashed.item_ids() {
        let stash = BTreeSet::from([stashed.clone()]);
        let map = build_reverse_map(&trees(&catalog, &goals, &stash), &stash);
        let keys: BTreeSet<&ItemId> = map.item_ids().collect();
        assert!(keys.is_subset(&all_keys), "stashing {stashed} added keys");
        assert!(!map.contains(stashed.as_str()));
    }
}

#[test]
fn stashed_power_rod_narrows_taser_goals() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield", "raider_hatch_key"]);

    let map = build_reverse_map(&trees(&catalog, &goals, &BTreeSet::new()), &BTreeSet::new());
    let taser = map.get("broken_taser").unwrap();
    assert_eq!(taser.len(), 1);
    assert_eq!(taser[0].goal_item_ids, goals);

    let stash = set(&["power_rod"]);
    let map = build_reverse_map(&trees(&catalog, &goals, &stash), &stash);
    let taser = map.get("broken_taser").unwrap();
    assert_eq!(taser[0].goal_item_ids, ids(&["raider_hatch_key"]));
    assert!(!map.contains("advanced_electrical_components"));
}

#[test]
fn pruning_removes_subtree_of_stashed_item_in_stale_trees() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield"]);
    // Trees built before the rod was stashed.
    let stale = trees(&catalog, &goals, &BTreeSet::new());
    let stash = set(&["power_rod"]);
    let map = build_reverse_map(&stale, &stash);

    assert!(!map.contains("power_rod"));
    assert!(!map.contains("advanced_electrical_components"));
    assert!(!map.contains("arc_circuitry"));
    assert!(!map.contains("sensor"));
    assert!(!map.contains("broken_handheld_radio"));
    assert!(map.contains("voltage_converter"));
}

// =============================================================================
// Classifier
// =============================================================================

#[test]
fn radio_action_follows_goal_counts() {
    let catalog = catalog();

    let goals = ids(&["heavy_shield"]);
    let map = build_reverse_map(&trees(&catalog, &goals, &BTreeSet::new()), &BTreeSet::new());
    // One goal via salvage and the same goal via recycle: tie.
    assert_eq!(classify("broken_handheld_radio", &map), Some(ItemAction::Salvage));

    let goals = ids(&["heavy_shield", "raider_hatch_key"]);
    let map = build_reverse_map(&trees(&catalog, &goals, &BTreeSet::new()), &BTreeSet::new());
    assert_eq!(classify("broken_handheld_radio", &map), Some(ItemAction::Recycle));
}

#[test]
fn any_recipe_use_means_keep() {
    let catalog = catalog();
    let goals = ids(&["heavy_shield", "raider_hatch_key"]);
    let map = build_reverse_map(&trees(&catalog, &goals, &BTreeSet::new()), &BTreeSet::new());

    for (item_id, usages) in map.iter() {
        if usages.iter().any(|u| u.relationship == Relationship::Recipe) {
            assert_eq!(classify(item_id.as_str(), &map), Some(ItemAction::Keep));
        }
    }
    assert_eq!(classify("broken_taser", &map), Some(ItemAction::Salvage));
    assert_eq!(classify("kettle_iv", &map), None);
}

// =============================================================================
// Planner
// =============================================================================

#[test]
fn plan_builds_sorted_loot_list() {
    let catalog = catalog();
    let selections = Selections {
        goals: ids(&["heavy_shield", "raider_hatch_key"]),
        ..Selections::default()
    };
    let plan = LootPlanner::new(&catalog, ResolverConfig::default()).plan(&selections);

    let names: Vec<&str> = plan.loot.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Advanced Electrical Components",
            "Arc Circuitry",
            "Broken Handheld Radio",
            "Broken Taser",
            "Power Rod",
            "Rusted Tools",
            "Sensor",
            "Voltage Converter",
            "Wires",
        ]
    );

    let taser = plan.loot.iter().find(|e| e.item_id.as_str() == "broken_taser").unwrap();
    assert_eq!(taser.action, Some(ItemAction::Salvage));
    assert_eq!(taser.goal_count, 2);
    assert_eq!(taser.priority, Priority::Medium);

    let counts = plan.facet_counts();
    assert_eq!(counts.types.get("Recyclable").copied(), Some(3));
    assert_eq!(counts.rarities.get(&Rarity::Rare).copied(), Some(3));
    assert_eq!(counts.locations.get("Electrical").copied(), Some(4));
}

#[test]
fn plan_respects_disabled_stash_and_filters() {
    let catalog = catalog();
    let mut selections = Selections {
        goals: ids(&["heavy_shield"]),
        stash: set(&["power_rod"]),
        ..Selections::default()
    };
    let planner = LootPlanner::new(&catalog, ResolverConfig::default());

    let plan = planner.plan(&selections);
    assert!(plan.loot.iter().all(|e| e.item_id.as_str() != "sensor"));

    selections.disabled_stash = set(&["power_rod"]);
    assert!(active_stash(&selections.stash, &selections.disabled_stash).is_empty());
    let plan = planner.plan(&selections);
    assert!(plan.loot.iter().any(|e| e.item_id.as_str() == "sensor"));

    let filter = LootFilter {
        search: Some("broken".to_owned()),
        locations: Some(BTreeSet::from(["Residential".to_owned()])),
        ..LootFilter::default()
    };
    let filtered = plan.filtered_loot(&filter);
    let filtered_ids: Vec<&str> = filtered.iter().map(|e| e.item_id.as_str()).collect();
    assert_eq!(filtered_ids, vec!["broken_handheld_radio"]);
}
