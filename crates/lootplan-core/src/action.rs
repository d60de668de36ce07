//! Recommended action per item.
//!
//! Given the reverse usage map, an item is classified as:
//!
//! - [`ItemAction::Keep`] -- it is a recipe ingredient for some goal.
//! - [`ItemAction::Salvage`] / [`ItemAction::Recycle`] -- it is only useful
//!   broken down. When both breakdown methods apply, the one serving more
//!   distinct goals wins; a tie goes to salvage.
//!
//! Items with no usage have no recommendation.

use std::collections::BTreeSet;

use lootplan_types::{ItemAction, ItemId, Relationship};

use crate::reverse::ReverseUsageMap;

/// Recommended action for `item_id`, or `None` if nothing uses it.
pub fn classify(item_id: &str, reverse_map: &ReverseUsageMap) -> Option<ItemAction> {
    let usages = reverse_map.get(item_id).filter(|u| !u.is_empty())?;

    if usages.iter().any(|u| u.relationship == Relationship::Recipe) {
        return Some(ItemAction::Keep);
    }

    let goals_for = |relationship: Relationship| {
        usages
            .iter()
            .filter(|u| u.relationship == relationship)
            .flat_map(|u| u.goal_item_ids.iter())
            .collect::<BTreeSet<&ItemId>>()
            .len()
    };
    let has = |relationship: Relationship| usages.iter().any(|u| u.relationship == relationship);

    match (has(Relationship::Salvage), has(Relationship::Recycle)) {
        (true, true) => {
            if goals_for(Relationship::Recycle) > goals_for(Relationship::Salvage) {
                Some(ItemAction::Recycle)
            } else {
                Some(ItemAction::Salvage)
            }
        }
        (true, false) => Some(ItemAction::Salvage),
        (false, true) => Some(ItemAction::Recycle),
        (false, false) => None,
    }
}
