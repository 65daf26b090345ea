//! Catalog entity types.
//!
//! A [`CatalogEntity`] is one cataloged subject (a taxon) assembled from the
//! normalized store tables: the core species row, its photos, its embedding,
//! and two free-form metadata blobs.

use serde::{Deserialize, Serialize};

/// Stable identifier of a cataloged taxon.
pub type TaxonId = i64;

/// A photo attached to a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Source URL of the image
    #[serde(default)]
    pub url: String,
    /// License code (e.g. "cc-by")
    #[serde(default)]
    pub license_code: Option<String>,
    /// Attribution line required by the license
    #[serde(default)]
    pub attribution: Option<String>,
    /// Where the photo was fetched from
    #[serde(default)]
    pub source: Option<String>,
}

impl Photo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            license_code: None,
            attribution: None,
            source: None,
        }
    }
}

/// How an entity's embedding vector was produced.
///
/// Every field defaults when missing so that partially written provenance
/// blobs still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingProvenance {
    /// Feature extractor model id
    pub model: String,
    /// Aggregation method (e.g. "mean_of_photos")
    pub method: String,
    /// Center-crop scale applied before extraction
    #[serde(rename = "cropScale")]
    pub crop_scale: f64,
    /// Photos available for the entity
    pub photos_total: u32,
    /// Photos that contributed to the vector
    pub photos_used: u32,
    /// Photos discarded as outliers or failures
    pub removed: u32,
    /// Vector dimension
    pub dim: u32,
}

/// One cataloged subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub taxon_id: TaxonId,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Free-form structured metadata (e.g. encyclopedia extracts)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    /// Embedding vector, assumed L2-normalized by its producer
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub embedding_meta: Option<EmbeddingProvenance>,
}

impl CatalogEntity {
    pub fn new(taxon_id: TaxonId) -> Self {
        Self {
            taxon_id,
            ..Default::default()
        }
    }

    pub fn with_scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_name = Some(name.into());
        self
    }

    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_embedding(mut self, vector: Vec<f32>) -> Self {
        self.embedding = Some(vector);
        self
    }

    pub fn with_embedding_meta(mut self, provenance: EmbeddingProvenance) -> Self {
        self.embedding_meta = Some(provenance);
        self
    }

    /// Name shown to users: common name, then scientific name, then slug.
    pub fn display_name(&self) -> String {
        [&self.common_name, &self.scientific_name, &self.slug]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("taxon {}", self.taxon_id))
    }

    /// Length of the embedding vector, if the entity has one.
    pub fn embedding_dim(&self) -> Option<usize> {
        self.embedding.as_ref().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_common_name() {
        let entity = CatalogEntity::new(1)
            .with_scientific_name("Paracanthurus hepatus")
            .with_common_name("Blue tang");
        assert_eq!(entity.display_name(), "Blue tang");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let entity = CatalogEntity::new(7).with_scientific_name("Amphiprion ocellaris");
        assert_eq!(entity.display_name(), "Amphiprion ocellaris");

        let entity = CatalogEntity::new(8)
            .with_common_name("  ")
            .with_slug("amphiprion-percula");
        assert_eq!(entity.display_name(), "amphiprion-percula");

        assert_eq!(CatalogEntity::new(9).display_name(), "taxon 9");
    }

    #[test]
    fn test_provenance_decodes_partial_json() {
        let json = r#"{"model": "clip-vit-b32", "cropScale": 0.9, "dim": 512}"#;
        let provenance: EmbeddingProvenance = serde_json::from_str(json).unwrap();
        assert_eq!(provenance.model, "clip-vit-b32");
        assert!((provenance.crop_scale - 0.9).abs() < f64::EPSILON);
        assert_eq!(provenance.dim, 512);
        assert_eq!(provenance.photos_used, 0);
        assert!(provenance.method.is_empty());
    }

    #[test]
    fn test_entity_ignores_unknown_fields() {
        let json = r#"{
            "taxon_id": 47178,
            "common_name": "Clownfish",
            "photos": [{"url": "https://example.org/a.jpg", "license_code": "cc-by"}],
            "embedding": [1.0, 0.0],
            "text_embedding": [0.5, 0.5]
        }"#;
        let entity: CatalogEntity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.taxon_id, 47178);
        assert_eq!(entity.photos.len(), 1);
        assert_eq!(entity.photos[0].license_code.as_deref(), Some("cc-by"));
        assert_eq!(entity.embedding_dim(), Some(2));
        assert!(entity.meta.is_none());
    }
}
