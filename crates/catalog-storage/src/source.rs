//! Read-side seam between the catalog and whatever builds indexes from it.

use catalog_types::CatalogEntity;

use crate::error::StorageError;
use crate::store::CatalogStore;

/// Opaque change marker for a catalog.
///
/// Two versions compare equal only if no write was committed in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogVersion {
    /// SQLite `PRAGMA data_version`; moves when another connection commits
    pub data_version: i64,
    /// Writes committed through the reading handle itself
    pub local_writes: u64,
}

/// A bulk-readable catalog.
///
/// Implementations must be thread-safe; loads are executed on a blocking
/// worker thread.
pub trait CatalogSource: Send + Sync {
    /// Materialize every entity, in a stable order.
    fn load_all(&self) -> Result<Vec<CatalogEntity>, StorageError>;

    /// Current change marker.
    fn version(&self) -> Result<CatalogVersion, StorageError>;
}

impl CatalogSource for CatalogStore {
    fn load_all(&self) -> Result<Vec<CatalogEntity>, StorageError> {
        CatalogStore::load_all(self)
    }

    fn version(&self) -> Result<CatalogVersion, StorageError> {
        CatalogStore::version(self)
    }
}
