//! Dense index packing.
//!
//! A [`DenseIndex`] is the catalog flattened into one contiguous row-major
//! `N x D` buffer plus index-aligned identifier and name arrays. Row `i` of
//! the matrix, `ids[i]`, and `names[i]` all describe the same entity; input
//! order is preserved so row position is the join key.

use catalog_types::{CatalogEntity, TaxonId};
use tracing::{debug, warn};

use crate::error::VectorError;
use crate::norm::NormCheck;

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of rows
    pub vector_count: usize,
    /// Embedding dimension
    pub dimension: usize,
    /// Bytes held by the matrix buffer
    pub matrix_bytes: usize,
}

/// Immutable, in-memory, row-major embedding matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseIndex {
    dim: usize,
    matrix: Vec<f32>,
    ids: Vec<TaxonId>,
    names: Vec<String>,
}

impl DenseIndex {
    /// Pack every record that has an embedding into a new index.
    ///
    /// Fails with `EmptyDimension` when `dim == 0` and with
    /// `DimensionMismatch` when any embedding length differs from `dim`.
    /// Records without an embedding are not searchable and are skipped.
    pub fn build(records: &[CatalogEntity], dim: usize) -> Result<Self, VectorError> {
        Self::build_with(records, dim, NormCheck::Trust)
    }

    /// [`DenseIndex::build`] with a norm policy applied to every row.
    pub fn build_with(
        records: &[CatalogEntity],
        dim: usize,
        norm_check: NormCheck,
    ) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::EmptyDimension);
        }

        let rows: Vec<(&CatalogEntity, &[f32])> = records
            .iter()
            .filter_map(|record| record.embedding.as_deref().map(|v| (record, v)))
            .collect();

        if let Some((record, vector)) = rows.iter().find(|(_, v)| v.len() != dim) {
            warn!(
                taxon_id = record.taxon_id,
                expected = dim,
                actual = vector.len(),
                "Rejecting index build: embedding dimension mismatch"
            );
            return Err(VectorError::DimensionMismatch {
                expected: dim,
                actual: vector.len(),
            });
        }

        let mut matrix = vec![0.0f32; rows.len() * dim];
        for (slot, (record, vector)) in matrix.chunks_exact_mut(dim).zip(&rows) {
            slot.copy_from_slice(vector);
            norm_check.apply(slot, || format!("taxon {}", record.taxon_id))?;
        }

        let skipped = records.len() - rows.len();
        if skipped > 0 {
            debug!(skipped, "Skipped records without embeddings");
        }

        Ok(Self {
            dim,
            matrix,
            ids: rows.iter().map(|(record, _)| record.taxon_id).collect(),
            names: rows.iter().map(|(record, _)| record.display_name()).collect(),
        })
    }

    /// Embedding dimension `D`
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of rows `N`
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The whole `N * D` row-major buffer.
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn ids(&self) -> &[TaxonId] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.dim)?;
        self.matrix.get(start..start + self.dim)
    }

    /// Row position of a taxon.
    pub fn position(&self, taxon_id: TaxonId) -> Option<usize> {
        self.ids.iter().position(|&id| id == taxon_id)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            vector_count: self.len(),
            dimension: self.dim,
            matrix_bytes: self.matrix.len() * std::mem::size_of::<f32>(),
        }
    }
}
