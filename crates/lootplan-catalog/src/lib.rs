//! The item catalog for Lootplan.
//!
//! The catalog is loaded once per session and then treated as an immutable
//! snapshot: every resolver call receives it explicitly by reference. There
//! is no global cache.
//!
//! # Modules
//!
//! - [`catalog`] -- [`Catalog`]: id lookup, JSON loading, and the
//!   salvage/recycle source index
//! - [`error`] -- Error types for catalog loading ([`CatalogError`])
//! - [`tiers`] -- Weapon-tier consolidation and upgrade breakdowns

pub mod catalog;
pub mod error;
pub mod tiers;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use tiers::{UpgradeStep, base_weapon_name, consolidate_weapon_tiers};
