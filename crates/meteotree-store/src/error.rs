//! Error types for meteotree-store.

use std::path::PathBuf;

use meteotree_types::{IdError, PointId};

/// Result type for meteotree-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in meteotree-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A value was written to a point that was never defined.
    #[error("Point not defined: {0}")]
    Undefined(PointId),

    /// A persisted row carries an identifier that no longer validates.
    #[error("Corrupt identifier {id:?} in store: {source}")]
    CorruptId { id: String, source: IdError },

    /// Serialization error for a stored value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure injected by a test double.
    #[error("Injected failure: {0}")]
    Injected(String),
}
