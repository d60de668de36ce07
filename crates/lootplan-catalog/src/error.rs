//! Error types for the `lootplan-catalog` crate.
//!
//! Catalog loading is the only fallible step in the pipeline. Once a
//! [`Catalog`](crate::Catalog) exists, lookups never fail; unknown ids
//! simply return `None`.

use std::path::PathBuf;

use lootplan_types::ItemId;

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog content is not valid JSON or an item record is malformed.
    #[error("failed to parse catalog JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The top-level JSON value is neither an array nor an object.
    #[error("catalog must be a JSON array or object of items, found {found}")]
    UnexpectedShape {
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// Two records share the same id.
    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),
}
