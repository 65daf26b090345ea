//! Storage layer error types.

use catalog_types::TaxonId;
use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// The catalog file could not be opened or created
    #[error("Catalog store unavailable at {path}: {reason}")]
    StorageUnavailable { path: String, reason: String },

    /// Schema DDL failed; the bootstrap transaction was rolled back
    #[error("Schema bootstrap failed: {0}")]
    SchemaBootstrapFailed(String),

    /// SQLite operation failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored vector blob disagrees with its declared dimension
    #[error("Corrupt vector for taxon {taxon_id}: dim {dim} but {bytes} bytes")]
    CorruptVector {
        taxon_id: TaxonId,
        dim: i64,
        bytes: usize,
    },

    /// Connection mutex poisoned by a panicking holder
    #[error("Catalog connection lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
