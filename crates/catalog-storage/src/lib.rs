//! Storage layer for the catalog matching system.
//!
//! Provides a SQLite-backed catalog with:
//! - Fixed relational schema bootstrapped inside one transaction
//! - Bulk materialization of entities with photos, embeddings, and metadata
//! - Best-effort metadata decoding (a malformed blob never fails a load)
//! - Change detection via [`CatalogVersion`] for index invalidation
//! - JSON bundle ingestion for populating a catalog out of band

pub mod codec;
pub mod error;
pub mod ingest;
pub mod schema;
pub mod source;
pub mod store;

pub use error::StorageError;
pub use ingest::{import_bundle, import_bundle_if_empty, parse_bundle, ImportReport};
pub use schema::BootstrapOutcome;
pub use source::{CatalogSource, CatalogVersion};
pub use store::{CatalogStats, CatalogStore};
