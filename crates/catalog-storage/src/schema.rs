//! Table definitions for the SQLite catalog.
//!
//! Each table isolates one part of an entity:
//! - species: core identity and names
//! - photos: zero or more attached photos per taxon
//! - embeddings: one vector per taxon, stored as a little-endian f32 blob
//! - species_meta: free-form JSON metadata per taxon
//! - embedding_meta: JSON provenance of the embedding per taxon

/// Table name for core entity rows
pub const TABLE_SPECIES: &str = "species";

/// Table name for attached photos
pub const TABLE_PHOTOS: &str = "photos";

/// Table name for embedding vectors
pub const TABLE_EMBEDDINGS: &str = "embeddings";

/// Table name for entity metadata JSON
pub const TABLE_SPECIES_META: &str = "species_meta";

/// Table name for embedding provenance JSON
pub const TABLE_EMBEDDING_META: &str = "embedding_meta";

/// All table names the catalog expects
pub const ALL_TABLES: &[&str] = &[
    TABLE_SPECIES,
    TABLE_PHOTOS,
    TABLE_EMBEDDINGS,
    TABLE_SPECIES_META,
    TABLE_EMBEDDING_META,
];

/// Catalog DDL. Every statement is idempotent so an interrupted bootstrap
/// can be re-run as a whole.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS species (
    taxon_id INTEGER PRIMARY KEY,
    scientific_name TEXT,
    common_name TEXT,
    rank TEXT,
    slug TEXT
);

CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    taxon_id INTEGER NOT NULL,
    url TEXT NOT NULL,
    license_code TEXT,
    attribution TEXT,
    source TEXT
);

CREATE TABLE IF NOT EXISTS embeddings (
    taxon_id INTEGER PRIMARY KEY,
    dim INTEGER NOT NULL,
    vec BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS species_meta (
    taxon_id INTEGER PRIMARY KEY,
    meta_json TEXT
);

CREATE TABLE IF NOT EXISTS embedding_meta (
    taxon_id INTEGER PRIMARY KEY,
    meta_json TEXT
);

CREATE INDEX IF NOT EXISTS idx_species_scientific_name ON species(scientific_name);
CREATE INDEX IF NOT EXISTS idx_photos_taxon_id ON photos(taxon_id);
";

/// What `bootstrap_if_empty` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No catalog tables existed; the schema was created
    Created,
    /// Some tables were missing (an earlier bootstrap was interrupted); the schema was completed
    Completed,
    /// Every table already existed; nothing ran
    AlreadyPresent,
}
