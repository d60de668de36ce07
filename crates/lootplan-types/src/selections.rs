//! The player's persisted selections.
//!
//! Only these inputs are ever persisted. Everything derived from them
//! (trees, the reverse usage map, recommended actions) is recomputed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ItemId;

/// Goal and stash selections for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Selections {
    /// Goal items in the order the player added them.
    #[serde(default)]
    pub goals: Vec<ItemId>,
    /// Goals temporarily excluded from planning.
    #[serde(default)]
    pub disabled_goals: BTreeSet<ItemId>,
    /// Items the player already has.
    #[serde(default)]
    pub stash: BTreeSet<ItemId>,
    /// Stash items temporarily ignored, as if not owned.
    #[serde(default)]
    pub disabled_stash: BTreeSet<ItemId>,
}

impl Selections {
    /// Goals that are not disabled, in order, without duplicates.
    pub fn enabled_goals(&self) -> Vec<ItemId> {
        let mut seen = BTreeSet::new();
        self.goals
            .iter()
            .filter(|id| !self.disabled_goals.contains(*id))
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Whether `item_id` is in the goal list, enabled or not.
    pub fn is_goal(&self, item_id: &str) -> bool {
        self.goals.iter().any(|id| id.as_str() == item_id)
    }
}
