//! Exhaustive similarity search over a [`DenseIndex`].
//!
//! All `N` scores are computed with one matrix-vector product over the
//! contiguous matrix, then ranked by a stable full sort so that equal scores
//! keep catalog order.

use std::cmp::Ordering;

use catalog_types::TaxonId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VectorError;
use crate::index::DenseIndex;

/// One ranked match. `score` is the raw dot product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub taxon_id: TaxonId,
    pub name: String,
    pub score: f32,
}

impl SearchResult {
    pub fn new(taxon_id: TaxonId, name: impl Into<String>, score: f32) -> Self {
        Self {
            taxon_id,
            name: name.into(),
            score,
        }
    }
}

/// Score every row of `index` against `query` and return the `top_k` best.
///
/// `top_k` larger than the index is clamped; an empty index yields no
/// results. Ties keep row order.
pub fn search(
    index: &DenseIndex,
    query: &[f32],
    top_k: usize,
) -> Result<Vec<SearchResult>, VectorError> {
    if query.len() != index.dimension() {
        return Err(VectorError::DimensionMismatch {
            expected: index.dimension(),
            actual: query.len(),
        });
    }
    if index.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    let scores = gemv(index.matrix(), index.dimension(), query);

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));
    order.truncate(top_k);

    let results: Vec<SearchResult> = order
        .into_iter()
        .map(|row| SearchResult::new(index.ids()[row], index.names()[row].clone(), scores[row]))
        .collect();

    debug!(rows = index.len(), k = top_k, found = results.len(), "Search complete");
    Ok(results)
}

/// Higher scores first; NaN sorts after every number.
fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// `scores = matrix (N x dim) * query (dim)`.
pub fn gemv(matrix: &[f32], dim: usize, query: &[f32]) -> Vec<f32> {
    debug_assert_eq!(query.len(), dim);
    matrix
        .chunks_exact(dim)
        .map(|row| dot(row, query))
        .collect()
}

/// 8-lane unrolled dot product.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let a_chunks = a.chunks_exact(8);
    let b_chunks = b.chunks_exact(8);
    let tail: f32 = a_chunks
        .remainder()
        .iter()
        .zip(b_chunks.remainder())
        .map(|(x, y)| x * y)
        .sum();

    let mut lanes = [0.0f32; 8];
    for (ca, cb) in a_chunks.zip(b_chunks) {
        for (lane, (x, y)) in lanes.iter_mut().zip(ca.iter().zip(cb)) {
            *lane += x * y;
        }
    }

    (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]) + (lanes[4] + lanes[5]) + (lanes[6] + lanes[7])
        + tail
}
