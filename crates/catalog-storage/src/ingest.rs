//! JSON bundle ingestion.
//!
//! A bundle is the offline export of the catalog: either
//! `{"items": [ ... ]}` or a bare array of items, where each item carries the
//! taxon fields, photos, metadata, and its precomputed embedding. Fields the
//! catalog does not store (e.g. `text_embedding`) are ignored.

use std::path::Path;

use catalog_types::CatalogEntity;
use serde::Deserialize;
use tracing::info;

use crate::error::StorageError;
use crate::store::CatalogStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum Bundle {
    Wrapped { items: Vec<CatalogEntity> },
    Bare(Vec<CatalogEntity>),
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Entities written
    pub imported: usize,
    /// Entities written without an embedding row
    pub without_embedding: usize,
    /// Photos written across all entities
    pub photos: usize,
}

/// Parse a bundle document into entities.
///
/// An empty `embedding` array means "no embedding".
pub fn parse_bundle(json: &str) -> Result<Vec<CatalogEntity>, StorageError> {
    let bundle: Bundle = serde_json::from_str(json)?;
    let mut items = match bundle {
        Bundle::Wrapped { items } => items,
        Bundle::Bare(items) => items,
    };
    for item in &mut items {
        if item.embedding.as_ref().is_some_and(Vec::is_empty) {
            item.embedding = None;
        }
    }
    Ok(items)
}

/// Read a bundle file and upsert every item in one transaction.
pub fn import_bundle(
    store: &CatalogStore,
    path: impl AsRef<Path>,
) -> Result<ImportReport, StorageError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let items = parse_bundle(&json)?;

    store.upsert_entities(&items)?;

    let report = ImportReport {
        imported: items.len(),
        without_embedding: items.iter().filter(|e| e.embedding.is_none()).count(),
        photos: items.iter().map(|e| e.photos.len()).sum(),
    };
    info!(
        path = ?path,
        imported = report.imported,
        without_embedding = report.without_embedding,
        photos = report.photos,
        "Imported catalog bundle"
    );
    Ok(report)
}

/// Import only into a catalog that has no species yet.
///
/// Returns `None` when the catalog was already populated.
pub fn import_bundle_if_empty(
    store: &CatalogStore,
    path: impl AsRef<Path>,
) -> Result<Option<ImportReport>, StorageError> {
    if store.species_count()? > 0 {
        info!("Catalog already populated, skipping import");
        return Ok(None);
    }
    import_bundle(store, path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUNDLE: &str = r#"{
        "items": [
            {
                "taxon_id": 2,
                "scientific_name": "Paracanthurus hepatus",
                "common_name": "Palette surgeonfish",
                "slug": "paracanthurus-hepatus",
                "photos": [
                    {"url": "https://example.org/p1.jpg", "license_code": "cc-by-nc",
                     "attribution": "a", "source": "inat"},
                    {"url": "https://example.org/p2.jpg"}
                ],
                "meta": {"wikipedia": {"title": "Paracanthurus", "lang": "en"}},
                "embedding": [0.0, 1.0],
                "text_embedding": [0.7, 0.7],
                "embedding_meta": {"model": "clip", "method": "mean", "cropScale": 0.85,
                                   "photos_total": 2, "photos_used": 2, "removed": 0, "dim": 2}
            },
            {
                "taxon_id": 1,
                "scientific_name": "Amphiprion ocellaris",
                "embedding": []
            }
        ]
    }"#;

    fn write_bundle(temp: &TempDir, json: &str) -> std::path::PathBuf {
        let path = temp.path().join("bundle.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn store() -> CatalogStore {
        let store = CatalogStore::open_in_memory().unwrap();
        store.bootstrap_if_empty().unwrap();
        store
    }

    #[test]
    fn test_parse_wrapped_bundle() {
        let items = parse_bundle(BUNDLE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].photos.len(), 2);
        assert_eq!(items[0].embedding_meta.as_ref().unwrap().photos_used, 2);
        assert!(items[1].embedding.is_none());
    }

    #[test]
    fn test_parse_bare_array() {
        let items = parse_bundle(r#"[{"taxon_id": 5, "embedding": [1.0]}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].embedding, Some(vec![1.0]));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_bundle("{\"items\": 3}"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_import_bundle() {
        let temp = TempDir::new().unwrap();
        let path = write_bundle(&temp, BUNDLE);
        let store = store();

        let report = import_bundle(&store, &path).unwrap();
        assert_eq!(
            report,
            ImportReport {
                imported: 2,
                without_embedding: 1,
                photos: 2
            }
        );

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded[0].taxon_id, 1);
        assert!(loaded[0].embedding.is_none());
        assert_eq!(loaded[1].display_name(), "Palette surgeonfish");
        assert_eq!(loaded[1].embedding, Some(vec![0.0, 1.0]));
        assert_eq!(
            loaded[1].meta.as_ref().unwrap()["wikipedia"]["lang"],
            serde_json::json!("en")
        );
    }

    #[test]
    fn test_import_if_empty_runs_once() {
        let temp = TempDir::new().unwrap();
        let path = write_bundle(&temp, BUNDLE);
        let store = store();

        assert!(import_bundle_if_empty(&store, &path).unwrap().is_some());
        assert!(import_bundle_if_empty(&store, &path).unwrap().is_none());
        assert_eq!(store.species_count().unwrap(), 2);
    }

    #[test]
    fn test_import_missing_file() {
        let store = store();
        let result = import_bundle(&store, "/no/such/bundle.json");
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
