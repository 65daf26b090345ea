//! SQLite wrapper for the catalog.
//!
//! Provides:
//! - Store open with eager failure detection
//! - Transactional, retry-safe schema bootstrap
//! - Bulk load assembling one entity per species row
//! - Transactional upserts for the ingestion path
//! - Change detection and statistics

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use catalog_types::{CatalogEntity, EmbeddingProvenance, Photo, TaxonId};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::{decode_vector, encode_vector};
use crate::error::StorageError;
use crate::schema::{
    BootstrapOutcome, ALL_TABLES, SCHEMA_SQL, TABLE_EMBEDDING_META, TABLE_SPECIES_META,
};
use crate::source::CatalogVersion;

/// Row counts for operators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub species: u64,
    pub photos: u64,
    pub embeddings: u64,
    /// `(dimension, vector count)` pairs, ascending by dimension
    pub dimensions: Vec<(usize, u64)>,
}

/// The durable catalog of entities, photos, embeddings, and metadata.
///
/// The connection sits behind a mutex so one store handle can be shared
/// across threads; the search path only ever reads through it.
pub struct CatalogStore {
    conn: Mutex<Connection>,
    location: String,
    /// Bumped after every committed write through this handle
    local_writes: AtomicU64,
}

impl CatalogStore {
    /// Open the catalog file, creating it and its parent directories if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let unavailable = |reason: String| StorageError::StorageUnavailable {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| unavailable(e.to_string()))?;
        // Opening is lazy in SQLite; touch the file so a bad path fails here.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| unavailable(e.to_string()))?;

        info!(path = ?path, "Opened catalog store");
        Ok(Self::from_connection(conn, path.display().to_string()))
    }

    /// Open a private in-memory catalog.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::StorageUnavailable {
            path: ":memory:".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_connection(conn, ":memory:".to_string()))
    }

    fn from_connection(conn: Connection, location: String) -> Self {
        Self {
            conn: Mutex::new(conn),
            location,
            local_writes: AtomicU64::new(0),
        }
    }

    /// Path (or `:memory:`) this store was opened at.
    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Create the catalog schema unless every table already exists.
    ///
    /// The DDL runs in one transaction: a failure part-way through rolls back
    /// and the next call starts over.
    pub fn bootstrap_if_empty(&self) -> Result<BootstrapOutcome, StorageError> {
        let mut conn = self.lock()?;

        let existing = count_existing_tables(&conn)?;
        if existing == ALL_TABLES.len() {
            debug!("Catalog schema already present");
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        let outcome = if existing == 0 {
            BootstrapOutcome::Created
        } else {
            warn!(
                existing,
                expected = ALL_TABLES.len(),
                "Catalog schema incomplete, completing bootstrap"
            );
            BootstrapOutcome::Completed
        };

        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)
            .map_err(|e| StorageError::SchemaBootstrapFailed(e.to_string()))?;
        tx.commit()
            .map_err(|e| StorageError::SchemaBootstrapFailed(e.to_string()))?;

        info!(?outcome, location = %self.location, "Bootstrapped catalog schema");
        Ok(outcome)
    }

    /// Materialize every entity in the catalog, ordered by `taxon_id`.
    ///
    /// All tables are read inside one transaction so the result is a
    /// consistent snapshot. Malformed metadata JSON is logged and dropped for
    /// that entity only; a corrupt vector blob fails the whole load.
    pub fn load_all(&self) -> Result<Vec<CatalogEntity>, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut photos = load_photos(&tx)?;
        let photo_count: usize = photos.values().map(Vec::len).sum();
        let mut embeddings = load_embeddings(&tx)?;
        let embedding_count = embeddings.len();
        let mut species_meta = load_meta_rows(&tx, TABLE_SPECIES_META)?;
        let mut embedding_meta = load_meta_rows(&tx, TABLE_EMBEDDING_META)?;

        let mut stmt = tx.prepare(
            "SELECT taxon_id, scientific_name, common_name, rank, slug
             FROM species ORDER BY taxon_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CatalogEntity {
                    taxon_id: row.get(0)?,
                    scientific_name: row.get(1)?,
                    common_name: row.get(2)?,
                    rank: row.get(3)?,
                    slug: row.get(4)?,
                    ..Default::default()
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        tx.commit()?;

        let entities: Vec<CatalogEntity> = rows
            .into_iter()
            .map(|mut entity| {
                let id = entity.taxon_id;
                entity.photos = photos.remove(&id).unwrap_or_default();
                entity.embedding = embeddings.remove(&id);
                entity.meta = species_meta.remove(&id).and_then(|json| {
                    decode_meta::<serde_json::Value>(id, TABLE_SPECIES_META, &json)
                });
                entity.embedding_meta = embedding_meta.remove(&id).and_then(|json| {
                    decode_meta::<EmbeddingProvenance>(id, TABLE_EMBEDDING_META, &json)
                });
                entity
            })
            .collect();

        if !embeddings.is_empty() || !photos.is_empty() {
            debug!(
                orphan_embeddings = embeddings.len(),
                orphan_photo_groups = photos.len(),
                "Ignoring rows without a species entry"
            );
        }

        info!(
            entities = entities.len(),
            photos = photo_count,
            embeddings = embedding_count,
            "Loaded catalog"
        );
        Ok(entities)
    }

    /// Insert or replace one entity and everything attached to it.
    pub fn upsert_entity(&self, entity: &CatalogEntity) -> Result<(), StorageError> {
        self.upsert_entities(std::slice::from_ref(entity))
    }

    /// Insert or replace many entities in a single transaction.
    pub fn upsert_entities(&self, entities: &[CatalogEntity]) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for entity in entities {
            write_entity(&tx, entity)?;
        }
        tx.commit()?;

        self.local_writes.fetch_add(1, Ordering::SeqCst);
        debug!(count = entities.len(), "Upserted catalog entities");
        Ok(())
    }

    /// Stored embedding for one taxon, if any.
    pub fn embedding_for(&self, taxon_id: TaxonId) -> Result<Option<Vec<f32>>, StorageError> {
        let conn = self.lock()?;
        let row: Option<(i64, Vec<u8>)> = conn
            .query_row(
                "SELECT dim, vec FROM embeddings WHERE taxon_id = ?1",
                params![taxon_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(dim, blob)| decode_vector(taxon_id, dim, &blob))
            .transpose()
    }

    /// Number of species rows.
    pub fn species_count(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        count_rows(&conn, "species")
    }

    /// Current change marker; differs whenever the catalog was written since
    /// the previous call, through this handle or any other connection.
    pub fn version(&self) -> Result<CatalogVersion, StorageError> {
        let conn = self.lock()?;
        let data_version: i64 = conn.query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(CatalogVersion {
            data_version,
            local_writes: self.local_writes.load(Ordering::SeqCst),
        })
    }

    /// Row counts and the spread of stored vector dimensions.
    pub fn stats(&self) -> Result<CatalogStats, StorageError> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT dim, COUNT(*) FROM embeddings GROUP BY dim ORDER BY dim")?;
        let dimensions = stmt
            .query_map([], |row| {
                let dim: i64 = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((dim.max(0) as usize, count.max(0) as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);

        Ok(CatalogStats {
            species: count_rows(&conn, "species")?,
            photos: count_rows(&conn, "photos")?,
            embeddings: count_rows(&conn, "embeddings")?,
            dimensions,
        })
    }
}

fn count_existing_tables(conn: &Connection) -> Result<usize, StorageError> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ALL_TABLES
        .iter()
        .filter(|table| names.iter().any(|name| name == *table))
        .count())
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as u64)
}

fn load_photos(conn: &Connection) -> Result<HashMap<TaxonId, Vec<Photo>>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT taxon_id, url, license_code, attribution, source FROM photos ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, TaxonId>(0)?,
            Photo {
                url: row.get(1)?,
                license_code: row.get(2)?,
                attribution: row.get(3)?,
                source: row.get(4)?,
            },
        ))
    })?;

    let mut grouped: HashMap<TaxonId, Vec<Photo>> = HashMap::new();
    for row in rows {
        let (taxon_id, photo) = row?;
        grouped.entry(taxon_id).or_default().push(photo);
    }
    Ok(grouped)
}

fn load_embeddings(conn: &Connection) -> Result<HashMap<TaxonId, Vec<f32>>, StorageError> {
    let mut stmt = conn.prepare("SELECT taxon_id, dim, vec FROM embeddings")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, TaxonId>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(taxon_id, dim, blob)| {
            decode_vector(taxon_id, dim, &blob).map(|vector| (taxon_id, vector))
        })
        .collect()
}

/// Raw JSON per taxon; NULL rows are skipped.
fn load_meta_rows(
    conn: &Connection,
    table: &str,
) -> Result<HashMap<TaxonId, String>, StorageError> {
    let mut stmt = conn.prepare(&format!("SELECT taxon_id, meta_json FROM {table}"))?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, TaxonId>(0)?, row.get::<_, Option<String>>(1)?))
    })?;

    let mut map = HashMap::new();
    for row in rows {
        if let (taxon_id, Some(json)) = row? {
            map.insert(taxon_id, json);
        }
    }
    Ok(map)
}

fn decode_meta<T: DeserializeOwned>(taxon_id: TaxonId, table: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(taxon_id, table, error = %e, "Skipping malformed metadata");
            None
        }
    }
}

fn write_entity(conn: &Connection, entity: &CatalogEntity) -> Result<(), StorageError> {
    let id = entity.taxon_id;

    conn.execute(
        "INSERT OR REPLACE INTO species (taxon_id, scientific_name, common_name, rank, slug)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            entity.scientific_name,
            entity.common_name,
            entity.rank,
            entity.slug
        ],
    )?;

    conn.execute("DELETE FROM photos WHERE taxon_id = ?1", params![id])?;
    for photo in &entity.photos {
        conn.execute(
            "INSERT INTO photos (taxon_id, url, license_code, attribution, source)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                photo.url,
                photo.license_code,
                photo.attribution,
                photo.source
            ],
        )?;
    }

    match &entity.embedding {
        Some(vector) => {
            conn.execute(
                "INSERT OR REPLACE INTO embeddings (taxon_id, dim, vec) VALUES (?1, ?2, ?3)",
                params![id, vector.len() as i64, encode_vector(vector)],
            )?;
        }
        None => {
            conn.execute("DELETE FROM embeddings WHERE taxon_id = ?1", params![id])?;
        }
    }

    write_meta(conn, TABLE_SPECIES_META, id, entity.meta.as_ref())?;
    write_meta(conn, TABLE_EMBEDDING_META, id, entity.embedding_meta.as_ref())?;
    Ok(())
}

fn write_meta<T: Serialize>(
    conn: &Connection,
    table: &str,
    taxon_id: TaxonId,
    value: Option<&T>,
) -> Result<(), StorageError> {
    match value {
        Some(value) => {
            let json = serde_json::to_string(value)?;
            conn.execute(
                &format!("INSERT OR REPLACE INTO {table} (taxon_id, meta_json) VALUES (?1, ?2)"),
                params![taxon_id, json],
            )?;
        }
        None => {
            conn.execute(
                &format!("DELETE FROM {table} WHERE taxon_id = ?1"),
                params![taxon_id],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bootstrapped() -> CatalogStore {
        let store = CatalogStore::open_in_memory().unwrap();
        store.bootstrap_if_empty().unwrap();
        store
    }

    fn entity(id: TaxonId, vector: Vec<f32>) -> CatalogEntity {
        CatalogEntity::new(id)
            .with_scientific_name(format!("Species {id}"))
            .with_embedding(vector)
    }

    fn table_count(store: &CatalogStore) -> usize {
        count_existing_tables(&store.lock().unwrap()).unwrap()
    }

    #[test]
    fn test_bootstrap_creates_schema_once() {
        let store = CatalogStore::open_in_memory().unwrap();
        assert_eq!(table_count(&store), 0);

        assert_eq!(store.bootstrap_if_empty().unwrap(), BootstrapOutcome::Created);
        assert_eq!(table_count(&store), ALL_TABLES.len());

        assert_eq!(
            store.bootstrap_if_empty().unwrap(),
            BootstrapOutcome::AlreadyPresent
        );
    }

    #[test]
    fn test_bootstrap_completes_partial_schema() {
        let store = CatalogStore::open_in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TABLE species (taxon_id INTEGER PRIMARY KEY, scientific_name TEXT,
                 common_name TEXT, rank TEXT, slug TEXT);",
            )
            .unwrap();

        assert_eq!(store.bootstrap_if_empty().unwrap(), BootstrapOutcome::Completed);
        assert_eq!(table_count(&store), ALL_TABLES.len());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_failed_bootstrap_leaves_no_partial_schema() {
        let store = CatalogStore::open_in_memory().unwrap();
        // A view named like a table survives IF NOT EXISTS, then cannot be indexed.
        store
            .lock()
            .unwrap()
            .execute_batch("CREATE VIEW photos AS SELECT 1 AS taxon_id;")
            .unwrap();

        let result = store.bootstrap_if_empty();
        assert!(matches!(result, Err(StorageError::SchemaBootstrapFailed(_))));
        assert_eq!(table_count(&store), 0);

        store
            .lock()
            .unwrap()
            .execute_batch("DROP VIEW photos;")
            .unwrap();
        assert_eq!(store.bootstrap_if_empty().unwrap(), BootstrapOutcome::Created);
    }

    #[test]
    fn test_load_all_empty() {
        let store = bootstrapped();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_and_load_full_entity() {
        let store = bootstrapped();
        let mut original = CatalogEntity::new(47178)
            .with_scientific_name("Amphiprion ocellaris")
            .with_common_name("Clown anemonefish")
            .with_slug("amphiprion-ocellaris")
            .with_photo(Photo {
                url: "https://example.org/1.jpg".to_string(),
                license_code: Some("cc-by".to_string()),
                attribution: Some("(c) someone".to_string()),
                source: Some("inat".to_string()),
            })
            .with_photo(Photo::new("https://example.org/2.jpg"))
            .with_meta(serde_json::json!({
                "wikipedia": {"title": "Ocellaris clownfish", "sections": {"ecology": "reef"}}
            }))
            .with_embedding(vec![0.6, 0.8, 0.0])
            .with_embedding_meta(EmbeddingProvenance {
                model: "clip-vit-b32".to_string(),
                method: "mean".to_string(),
                crop_scale: 0.9,
                photos_total: 5,
                photos_used: 4,
                removed: 1,
                dim: 3,
            });
        original.rank = Some("species".to_string());

        store.upsert_entity(&original).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![original]);
    }

    #[test]
    fn test_load_orders_by_taxon_id() {
        let store = bootstrapped();
        store
            .upsert_entities(&[
                entity(30, vec![1.0, 0.0]),
                entity(10, vec![0.0, 1.0]),
                entity(20, vec![0.6, 0.8]),
            ])
            .unwrap();

        let ids: Vec<TaxonId> = store.load_all().unwrap().iter().map(|e| e.taxon_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_upsert_replaces_attachments() {
        let store = bootstrapped();
        let first = entity(1, vec![1.0, 0.0])
            .with_photo(Photo::new("a"))
            .with_photo(Photo::new("b"))
            .with_meta(serde_json::json!({"v": 1}));
        store.upsert_entity(&first).unwrap();

        let second = CatalogEntity::new(1)
            .with_common_name("Renamed")
            .with_photo(Photo::new("c"));
        store.upsert_entity(&second).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].common_name.as_deref(), Some("Renamed"));
        assert_eq!(loaded[0].photos, vec![Photo::new("c")]);
        assert!(loaded[0].embedding.is_none());
        assert!(loaded[0].meta.is_none());
    }

    #[test]
    fn test_malformed_metadata_is_skipped() {
        let store = bootstrapped();
        store
            .upsert_entities(&[
                entity(1, vec![1.0]).with_meta(serde_json::json!({"ok": true})),
                entity(2, vec![1.0]),
            ])
            .unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch(
                "INSERT INTO species_meta (taxon_id, meta_json) VALUES (2, '{not json');
                 INSERT INTO embedding_meta (taxon_id, meta_json) VALUES (2, '[1, 2');
                 INSERT INTO embedding_meta (taxon_id, meta_json) VALUES (1, NULL);",
            )
            .unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].meta, Some(serde_json::json!({"ok": true})));
        assert!(loaded[0].embedding_meta.is_none());
        assert!(loaded[1].meta.is_none());
        assert!(loaded[1].embedding_meta.is_none());
        assert_eq!(loaded[1].embedding, Some(vec![1.0]));
    }

    #[test]
    fn test_corrupt_vector_fails_load() {
        let store = bootstrapped();
        store.upsert_entity(&entity(3, vec![0.0, 1.0])).unwrap();
        store
            .lock()
            .unwrap()
            .execute("UPDATE embeddings SET dim = 3 WHERE taxon_id = 3", [])
            .unwrap();

        let result = store.load_all();
        assert!(matches!(
            result,
            Err(StorageError::CorruptVector {
                taxon_id: 3,
                dim: 3,
                bytes: 8
            })
        ));
    }

    #[test]
    fn test_load_without_schema_is_an_error() {
        let store = CatalogStore::open_in_memory().unwrap();
        assert!(matches!(store.load_all(), Err(StorageError::Sqlite(_))));
    }

    #[test]
    fn test_embedding_for() {
        let store = bootstrapped();
        store.upsert_entity(&entity(5, vec![0.25, 0.5])).unwrap();
        store.upsert_entity(&CatalogEntity::new(6)).unwrap();

        assert_eq!(store.embedding_for(5).unwrap(), Some(vec![0.25, 0.5]));
        assert_eq!(store.embedding_for(6).unwrap(), None);
        assert_eq!(store.embedding_for(7).unwrap(), None);
    }

    #[test]
    fn test_version_tracks_local_writes() {
        let store = bootstrapped();
        let before = store.version().unwrap();
        assert_eq!(store.version().unwrap(), before);

        store.upsert_entity(&entity(1, vec![1.0])).unwrap();
        assert_ne!(store.version().unwrap(), before);
    }

    #[test]
    fn test_version_tracks_other_connections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.sqlite3");

        let reader = CatalogStore::open(&path).unwrap();
        reader.bootstrap_if_empty().unwrap();
        let before = reader.version().unwrap();

        let writer = CatalogStore::open(&path).unwrap();
        writer.upsert_entity(&entity(1, vec![1.0])).unwrap();

        let after = reader.version().unwrap();
        assert_ne!(after, before);
        assert_eq!(after.local_writes, before.local_writes);
        assert_eq!(reader.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_open_creates_parent_and_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("catalog.sqlite3");

        {
            let store = CatalogStore::open(&path).unwrap();
            store.bootstrap_if_empty().unwrap();
            store.upsert_entity(&entity(9, vec![0.0, 1.0])).unwrap();
        }

        let store = CatalogStore::open(&path).unwrap();
        assert_eq!(
            store.bootstrap_if_empty().unwrap(),
            BootstrapOutcome::AlreadyPresent
        );
        assert_eq!(store.load_all().unwrap()[0].embedding, Some(vec![0.0, 1.0]));
        assert_eq!(store.location(), path.display().to_string());
    }

    #[test]
    fn test_open_unavailable_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = CatalogStore::open(blocker.join("catalog.sqlite3"));
        assert!(matches!(
            result,
            Err(StorageError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_stats() {
        let store = bootstrapped();
        store
            .upsert_entities(&[
                entity(1, vec![1.0, 0.0]).with_photo(Photo::new("a")),
                entity(2, vec![0.0, 1.0]),
                entity(3, vec![1.0, 0.0, 0.0]),
                CatalogEntity::new(4),
            ])
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.species, 4);
        assert_eq!(stats.photos, 1);
        assert_eq!(stats.embeddings, 3);
        assert_eq!(stats.dimensions, vec![(2, 2), (3, 1)]);
        assert_eq!(store.species_count().unwrap(), 4);
    }
}
