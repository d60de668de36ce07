//! Error types for selection persistence.

use std::path::PathBuf;

/// Errors that can occur while reading or writing stored selections.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file-backed read, write, or delete failed.
    #[error("store I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory the operation touched.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key that cannot be used as a file name.
    #[error("Invalid store key: {0}")]
    InvalidKey(String),
}
