//! # catalog-types
//!
//! Shared domain types for the catalog matching system.
//!
//! This crate defines the data structures used throughout the workspace:
//! - Entities: cataloged subjects with photos, metadata, and an embedding
//! - Provenance: how an entity's embedding was produced
//! - Settings: layered configuration for the store, index, and gate
//!
//! ## Usage
//!
//! ```rust
//! use catalog_types::CatalogEntity;
//!
//! let entity = CatalogEntity::new(42)
//!     .with_common_name("Blue tang")
//!     .with_embedding(vec![0.6, 0.8]);
//! assert_eq!(entity.display_name(), "Blue tang");
//! assert_eq!(entity.embedding_dim(), Some(2));
//! ```

pub mod config;
pub mod entity;
pub mod error;

pub use config::{GateSettings, IndexSettings, NormCheckMode, SearchSettings, Settings};
pub use entity::{CatalogEntity, EmbeddingProvenance, Photo, TaxonId};
pub use error::CatalogError;
