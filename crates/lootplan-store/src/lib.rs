//! Persistence of player selections for Lootplan.
//!
//! Only inputs are persisted: the goal list, the stash, their disabled
//! subsets, and the display filters. Each is stored as one JSON blob under a
//! fixed key in a [`KeyValueStore`]. Derived state (trees, usage maps,
//! actions) is never written.
//!
//! # Modules
//!
//! - [`kv`] -- The [`KeyValueStore`] trait with file and in-memory backends
//! - [`repository`] -- Typed load/save of selections ([`SelectionRepository`])
//! - [`error`] -- Shared error types

pub mod error;
pub mod kv;
pub mod repository;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::SelectionRepository;
