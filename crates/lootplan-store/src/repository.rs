//! Typed load/save of player selections.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `what-to-loot-goal-items` | Ordered goal id list |
//! | `what-to-loot-disabled-items` | Disabled goal ids |
//! | `what-to-loot-stash-items` | Stash ids |
//! | `what-to-loot-disabled-stash-items` | Disabled stash ids |
//! | `what-to-loot-enabled-types` | Enabled type filter |
//! | `what-to-loot-enabled-rarities` | Enabled rarity filter |
//! | `what-to-loot-enabled-locations` | Enabled location filter |
//!
//! Loads never fail: a missing key yields the empty default, and an
//! unreadable or corrupt blob is logged and treated the same way. Saves
//! propagate [`StoreError`].

use std::collections::BTreeSet;

use lootplan_core::LootFilter;
use lootplan_types::{ItemId, Rarity, Selections};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Ordered goal id list.
pub const GOAL_ITEMS_KEY: &str = "what-to-loot-goal-items";
/// Disabled goal ids.
pub const DISABLED_ITEMS_KEY: &str = "what-to-loot-disabled-items";
/// Stash ids.
pub const STASH_ITEMS_KEY: &str = "what-to-loot-stash-items";
/// Disabled stash ids.
pub const DISABLED_STASH_ITEMS_KEY: &str = "what-to-loot-disabled-stash-items";
/// Enabled type filter.
pub const ENABLED_TYPES_KEY: &str = "what-to-loot-enabled-types";
/// Enabled rarity filter.
pub const ENABLED_RARITIES_KEY: &str = "what-to-loot-enabled-rarities";
/// Enabled location filter.
pub const ENABLED_LOCATIONS_KEY: &str = "what-to-loot-enabled-locations";

/// Reads and writes selections through a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct SelectionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SelectionRepository<S> {
    /// Wrap `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    // =========================================================================
    // Goals
    // =========================================================================

    /// Goal ids in the order they were added.
    pub fn load_goals(&self) -> Vec<ItemId> {
        self.load(GOAL_ITEMS_KEY)
    }

    /// Replace the goal list.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_goals(&mut self, goals: &[ItemId]) -> Result<(), StoreError> {
        self.save(GOAL_ITEMS_KEY, goals)
    }

    /// Append `goal` unless already present. Returns the new list.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn add_goal(&mut self, goal: &ItemId) -> Result<Vec<ItemId>, StoreError> {
        let mut goals = self.load_goals();
        if !goals.contains(goal) {
            goals.push(goal.clone());
            self.save_goals(&goals)?;
        }
        Ok(goals)
    }

    /// Drop every occurrence of `goal`. Returns the new list.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn remove_goal(&mut self, goal: &ItemId) -> Result<Vec<ItemId>, StoreError> {
        let mut goals = self.load_goals();
        goals.retain(|id| id != goal);
        self.save_goals(&goals)?;
        Ok(goals)
    }

    /// Goals excluded from planning.
    pub fn load_disabled_goals(&self) -> BTreeSet<ItemId> {
        self.load(DISABLED_ITEMS_KEY)
    }

    /// Replace the disabled goal set.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_disabled_goals(&mut self, ids: &BTreeSet<ItemId>) -> Result<(), StoreError> {
        self.save(DISABLED_ITEMS_KEY, ids)
    }

    // =========================================================================
    // Stash
    // =========================================================================

    /// Items the player holds.
    pub fn load_stash(&self) -> BTreeSet<ItemId> {
        self.load(STASH_ITEMS_KEY)
    }

    /// Replace the stash.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_stash(&mut self, ids: &BTreeSet<ItemId>) -> Result<(), StoreError> {
        self.save(STASH_ITEMS_KEY, ids)
    }

    /// Stash entries ignored during planning.
    pub fn load_disabled_stash(&self) -> BTreeSet<ItemId> {
        self.load(DISABLED_STASH_ITEMS_KEY)
    }

    /// Replace the disabled stash set.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_disabled_stash(&mut self, ids: &BTreeSet<ItemId>) -> Result<(), StoreError> {
        self.save(DISABLED_STASH_ITEMS_KEY, ids)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// All four goal and stash selections.
    pub fn load_selections(&self) -> Selections {
        Selections {
            goals: self.load_goals(),
            disabled_goals: self.load_disabled_goals(),
            stash: self.load_stash(),
            disabled_stash: self.load_disabled_stash(),
        }
    }

    /// Persist all four goal and stash selections.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered.
    pub fn save_selections(&mut self, selections: &Selections) -> Result<(), StoreError> {
        self.save_goals(&selections.goals)?;
        self.save_disabled_goals(&selections.disabled_goals)?;
        self.save_stash(&selections.stash)?;
        self.save_disabled_stash(&selections.disabled_stash)
    }

    /// Stored display filters. Missing or empty sets mean "all enabled".
    /// The search term is never persisted.
    pub fn load_filter(&self) -> LootFilter {
        LootFilter {
            search: None,
            types: self.load_enabled::<String>(ENABLED_TYPES_KEY),
            rarities: self.load_enabled::<Rarity>(ENABLED_RARITIES_KEY),
            locations: self.load_enabled::<String>(ENABLED_LOCATIONS_KEY),
        }
    }

    /// Persist the filter sets. `None` clears the stored set.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered.
    pub fn save_filter(&mut self, filter: &LootFilter) -> Result<(), StoreError> {
        self.save_enabled(ENABLED_TYPES_KEY, filter.types.as_ref())?;
        self.save_enabled(ENABLED_RARITIES_KEY, filter.rarities.as_ref())?;
        self.save_enabled(ENABLED_LOCATIONS_KEY, filter.locations.as_ref())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                error!(key, error = %e, "failed to read stored selection");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            error!(key, error = %e, "discarding corrupt stored selection");
            T::default()
        })
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    fn load_enabled<T: DeserializeOwned + Ord>(&self, key: &str) -> Option<BTreeSet<T>> {
        Some(self.load::<BTreeSet<T>>(key)).filter(|set| !set.is_empty())
    }

    fn save_enabled<T: Serialize>(
        &mut self,
        key: &str,
        set: Option<&BTreeSet<T>>,
    ) -> Result<(), StoreError> {
        match set {
            Some(set) => self.save(key, set),
            None => self.store.remove(key),
        }
    }
}
