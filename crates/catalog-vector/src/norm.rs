//! Unit-norm policy.
//!
//! Scores are raw dot products, which equal cosine similarity only when both
//! the catalog rows and the query are L2-normalized. [`NormCheck`] decides
//! whether that is trusted, verified, or enforced.

use std::borrow::Cow;

use catalog_types::{IndexSettings, NormCheckMode};

use crate::error::VectorError;

/// How vectors are treated with respect to their L2 norm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NormCheck {
    /// Use vectors exactly as produced
    #[default]
    Trust,
    /// Reject vectors whose norm differs from 1 by more than `tolerance`
    Validate { tolerance: f32 },
    /// L2-normalize copies; zero vectors are left as is
    Normalize,
}

impl NormCheck {
    pub fn from_settings(settings: &IndexSettings) -> Self {
        match settings.norm_check {
            NormCheckMode::Trust => NormCheck::Trust,
            NormCheckMode::Validate => NormCheck::Validate {
                tolerance: settings.norm_tolerance,
            },
            NormCheckMode::Normalize => NormCheck::Normalize,
        }
    }

    /// Apply the policy to a vector in place.
    ///
    /// `label` is only evaluated when the vector is rejected.
    pub fn apply(
        &self,
        vector: &mut [f32],
        label: impl FnOnce() -> String,
    ) -> Result<(), VectorError> {
        match self {
            NormCheck::Trust => Ok(()),
            NormCheck::Validate { tolerance } => check_unit(vector, *tolerance, label),
            NormCheck::Normalize => {
                normalize_in_place(vector);
                Ok(())
            }
        }
    }

    /// Apply the policy to a query, copying only when it must change.
    pub fn prepare_query<'a>(&self, query: &'a [f32]) -> Result<Cow<'a, [f32]>, VectorError> {
        match self {
            NormCheck::Trust => Ok(Cow::Borrowed(query)),
            NormCheck::Validate { tolerance } => {
                check_unit(query, *tolerance, || "query".to_string())?;
                Ok(Cow::Borrowed(query))
            }
            NormCheck::Normalize => {
                let mut owned = query.to_vec();
                normalize_in_place(&mut owned);
                Ok(Cow::Owned(owned))
            }
        }
    }
}

fn check_unit(
    vector: &[f32],
    tolerance: f32,
    label: impl FnOnce() -> String,
) -> Result<(), VectorError> {
    let norm = l2_norm(vector);
    if (norm - 1.0).abs() <= tolerance {
        Ok(())
    } else {
        Err(VectorError::NotNormalized {
            label: label(),
            norm,
        })
    }
}

/// Euclidean length of a vector.
pub fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Normalize in place; returns false (and leaves the vector untouched) when
/// the norm is zero or not finite.
pub fn normalize_in_place(values: &mut [f32]) -> bool {
    let norm = l2_norm(values);
    if !norm.is_finite() || norm <= 0.0 {
        return false;
    }
    for value in values.iter_mut() {
        *value /= norm;
    }
    true
}
