//! Active stash computation.

use std::collections::BTreeSet;

use lootplan_types::ItemId;

/// Items the player holds and has not disabled.
///
/// Disabled entries that are not in the stash have no effect.
pub fn active_stash(stash: &BTreeSet<ItemId>, disabled: &BTreeSet<ItemId>) -> BTreeSet<ItemId> {
    stash.difference(disabled).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> BTreeSet<ItemId> {
        raw.iter().copied().map(ItemId::from).collect()
    }

    #[test]
    fn removes_disabled_entries() {
        let active = active_stash(&ids(&["rod", "wires", "sensor"]), &ids(&["wires"]));
        assert_eq!(active, ids(&["rod", "sensor"]));
    }

    #[test]
    fn disabled_outside_stash_is_ignored() {
        let active = active_stash(&ids(&["rod"]), &ids(&["ghost"]));
        assert_eq!(active, ids(&["rod"]));
    }

    #[test]
    fn empty_stash_stays_empty() {
        assert!(active_stash(&BTreeSet::new(), &ids(&["rod"])).is_empty());
    }
}
