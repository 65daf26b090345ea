//! Query-side facade: norm policy, index lookup, ranking, and the gate.

use catalog_types::Settings;
use tracing::debug;

use crate::coordinator::IndexCoordinator;
use crate::error::VectorError;
use crate::gate::{GateDecision, GatePolicy};
use crate::search::{search, SearchResult};

/// Identifies the closest catalog entries for a query embedding.
#[derive(Clone)]
pub struct CatalogMatcher {
    coordinator: IndexCoordinator,
    policy: GatePolicy,
    top_k: usize,
}

impl CatalogMatcher {
    pub fn new(coordinator: IndexCoordinator, policy: GatePolicy, top_k: usize) -> Self {
        Self {
            coordinator,
            policy,
            top_k,
        }
    }

    pub fn from_settings(coordinator: IndexCoordinator, settings: &Settings) -> Self {
        Self::new(
            coordinator,
            GatePolicy::from(&settings.gate),
            settings.search.top_k,
        )
    }

    pub fn coordinator(&self) -> &IndexCoordinator {
        &self.coordinator
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ranked results without gating.
    pub async fn rank(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorError> {
        let query = self.coordinator.norm_check().prepare_query(query)?;
        let index = self.coordinator.get_or_build_index(query.len()).await?;
        search(&index, &query, top_k)
    }

    /// Rank with the configured `top_k` (at least 1) and gate the result.
    ///
    /// An index that cannot be built is an error, not a rejection.
    pub async fn identify(&self, query: &[f32]) -> Result<GateDecision, VectorError> {
        let results = self.rank(query, self.top_k.max(1)).await?;
        let decision = self.policy.decide(results);
        debug!(accepted = decision.is_accepted(), "Identify complete");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::NormCheck;
    use catalog_storage::CatalogStore;
    use catalog_types::CatalogEntity;
    use std::sync::Arc;

    fn matcher_over(vectors: &[(i64, &str, Vec<f32>)], norm_check: NormCheck) -> CatalogMatcher {
        let store = CatalogStore::open_in_memory().unwrap();
        store.bootstrap_if_empty().unwrap();
        let entities: Vec<CatalogEntity> = vectors
            .iter()
            .map(|(id, name, v)| {
                CatalogEntity::new(*id)
                    .with_common_name(*name)
                    .with_embedding(v.clone())
            })
            .collect();
        store.upsert_entities(&entities).unwrap();
        let coordinator = IndexCoordinator::new(Arc::new(store), norm_check);
        CatalogMatcher::new(coordinator, GatePolicy::new(0.5, 0.1), 3)
    }

    #[tokio::test]
    async fn test_identify_accepts_clear_winner() {
        let matcher = matcher_over(
            &[
                (1, "Monarch", vec![1.0, 0.0]),
                (2, "Viceroy", vec![0.0, 1.0]),
            ],
            NormCheck::Trust,
        );

        let decision = matcher.identify(&[0.9, 0.1]).await.unwrap();
        let best = decision.best().unwrap();
        assert_eq!(best.taxon_id, 1);
        assert_eq!(best.name, "Monarch");
    }

    #[tokio::test]
    async fn test_identify_rejects_ambiguous() {
        let matcher = matcher_over(
            &[
                (1, "Monarch", vec![1.0, 0.0]),
                (2, "Viceroy", vec![0.0, 1.0]),
            ],
            NormCheck::Trust,
        );
        let decision = matcher.identify(&[0.7071, 0.7071]).await.unwrap();
        assert_eq!(decision, GateDecision::Rejected);
    }

    #[tokio::test]
    async fn test_identify_with_zero_top_k_still_ranks_one() {
        let matcher = matcher_over(&[(1, "Monarch", vec![1.0, 0.0])], NormCheck::Trust);
        let matcher = CatalogMatcher::new(matcher.coordinator().clone(), matcher.policy(), 0);

        let decision = matcher.identify(&[1.0, 0.0]).await.unwrap();
        assert_eq!(decision.into_results().len(), 1);
    }

    #[tokio::test]
    async fn test_identify_surfaces_dimension_errors() {
        let matcher = matcher_over(
            &[(1, "Monarch", vec![1.0, 0.0]), (2, "Odd", vec![1.0, 0.0, 0.0])],
            NormCheck::Trust,
        );
        assert!(matches!(
            matcher.identify(&[1.0, 0.0]).await,
            Err(VectorError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_normalized_query_is_scored_as_cosine() {
        let matcher = matcher_over(
            &[
                (1, "Monarch", vec![1.0, 0.0]),
                (2, "Viceroy", vec![0.0, 1.0]),
            ],
            NormCheck::Normalize,
        );

        let results = matcher.rank(&[3.0, 0.0], 2).await.unwrap();
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].score, 0.0);
    }
}
