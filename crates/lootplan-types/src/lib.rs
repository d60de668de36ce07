//! Shared type definitions for Lootplan.
//!
//! This crate is the single source of truth for the data model shared by the
//! catalog, the resolver, the selection store, and the command-line front
//! end. Types defined here flow downstream to `TypeScript` via `ts-rs` for
//! the web planner.
//!
//! # Modules
//!
//! - [`ids`] -- The [`ItemId`] newtype used as the key everywhere
//! - [`enums`] -- Rarity, relationship, breakdown method, and action enums
//! - [`item`] -- The catalog item record and its named predicates
//! - [`graph`] -- Crafting trees, salvage sources, and usage entries
//! - [`selections`] -- The player's persisted goal and stash selections

pub mod enums;
pub mod graph;
pub mod ids;
pub mod item;
pub mod selections;

// Re-export all public types at crate root for convenience.
pub use enums::{ItemAction, ItemKind, Priority, Rarity, Relationship, SourceMethod};
pub use graph::{CraftingNode, CraftingTree, SalvageSource, UsageEntry};
pub use ids::ItemId;
pub use item::{BASIC_MATERIAL, Item, LocalizedText, MODIFICATION, MaterialMap};
pub use selections::Selections;
