//! Vector index error types.

use std::sync::Arc;

use catalog_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during index builds and searches.
///
/// `Clone` so that one failed build can be reported to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum VectorError {
    /// A record's or query's length disagrees with the index dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Zero dimension requested
    #[error("Index dimension must be at least 1")]
    EmptyDimension,

    /// Vector norm outside tolerance under `NormCheck::Validate`
    #[error("Vector {label} is not unit length (norm {norm})")]
    NotNormalized { label: String, norm: f32 },

    /// Catalog load failed
    #[error("Storage error: {0}")]
    Storage(Arc<StorageError>),

    /// The blocking load task panicked or was cancelled
    #[error("Index build task failed: {0}")]
    BuildTask(String),
}

impl From<StorageError> for VectorError {
    fn from(err: StorageError) -> Self {
        VectorError::Storage(Arc::new(err))
    }
}
