//! Embedding blob encoding.
//!
//! A stored vector is `dim` consecutive little-endian f32 values.

use catalog_types::TaxonId;

use crate::error::StorageError;

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Encode a vector as a little-endian f32 blob.
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * F32_BYTES);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a blob of `dim` little-endian f32 values.
///
/// The blob length must be exactly `dim * 4`; nothing is truncated or padded.
pub fn decode_vector(taxon_id: TaxonId, dim: i64, blob: &[u8]) -> Result<Vec<f32>, StorageError> {
    let corrupt = || StorageError::CorruptVector {
        taxon_id,
        dim,
        bytes: blob.len(),
    };

    let dim = usize::try_from(dim).map_err(|_| corrupt())?;
    let expected_len = dim.checked_mul(F32_BYTES).ok_or_else(corrupt)?;
    if blob.len() != expected_len {
        return Err(corrupt());
    }

    Ok(blob
        .chunks_exact(F32_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
