//! Cosine similarity ranking over a [`VectorStore`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValluError};
use crate::vector::core::distance::batch_cosine_similarity;
use crate::vector::store::VectorStore;

/// Configuration for the similarity ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Stores with at least this many records are scored with rayon.
    pub parallel_threshold: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1024,
        }
    }
}

/// An item id with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredId {
    /// Item identifier.
    pub id: i64,
    /// Cosine similarity to the query (higher is more similar).
    pub similarity: f32,
}

/// Exact top-N ranker.
///
/// Every record is scored, the scores are sorted descending with a stable
/// sort, so equal scores keep the store's insertion order.
#[derive(Debug, Clone, Default)]
pub struct SimilarityRanker {
    config: RankerConfig,
}

impl SimilarityRanker {
    /// Create a new ranker.
    ///
    /// # Examples
    ///
    /// ```
    /// use vallu::vector::search::{RankerConfig, SimilarityRanker};
    ///
    /// let ranker = SimilarityRanker::new(RankerConfig::default());
    /// ```
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    /// Rank `store` against `query`, returning at most `top_n` scored ids.
    ///
    /// # Errors
    ///
    /// [`ValluError::InvalidInput`] when `top_n` is zero, or when the store is
    /// non-empty and `query` has a different dimension.
    pub fn rank_scored(
        &self,
        query: &[f32],
        store: &VectorStore,
        top_n: usize,
    ) -> Result<Vec<ScoredId>> {
        validate_top_n(top_n)?;

        let Some(dimension) = store.dimension() else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(ValluError::invalid_input(format!(
                "query vector has dimension {}, store has dimension {}",
                query.len(),
                dimension
            )));
        }

        let vectors: Vec<&[f32]> = store.iter().map(|r| r.vector.as_slice()).collect();
        let similarities =
            batch_cosine_similarity(query, &vectors, self.config.parallel_threshold)?;

        let mut scored: Vec<ScoredId> = store
            .iter()
            .zip(similarities)
            .map(|(record, similarity)| ScoredId {
                id: record.id,
                similarity,
            })
            .collect();

        // `sort_by` is stable: ties stay in insertion order.
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_n);
        Ok(scored)
    }

    /// Rank `store` against `query`, returning at most `top_n` ids.
    pub fn rank(&self, query: &[f32], store: &VectorStore, top_n: usize) -> Result<Vec<i64>> {
        Ok(self
            .rank_scored(query, store, top_n)?
            .into_iter()
            .map(|scored| scored.id)
            .collect())
    }
}

/// Reject a zero `top_n`.
pub(crate) fn validate_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(ValluError::invalid_input("top_n must be a positive integer"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::store::EmbeddingRecord;

    fn sample_store() -> VectorStore {
        VectorStore::from_records(vec![
            EmbeddingRecord::new(1, vec![1.0, 0.0]),
            EmbeddingRecord::new(2, vec![0.0, 1.0]),
            EmbeddingRecord::new(3, vec![0.9, 0.1]),
        ])
        .unwrap()
    }

    #[test]
    fn test_rank_returns_best_matches() {
        let ranker = SimilarityRanker::default();
        let ids = ranker.rank(&[1.0, 0.0], &sample_store(), 2).unwrap();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_rank_scored_similarities() {
        let ranker = SimilarityRanker::default();
        let scored = ranker.rank_scored(&[1.0, 0.0], &sample_store(), 3).unwrap();

        assert_eq!(scored.len(), 3);
        assert!((scored[0].similarity - 1.0).abs() < 1e-5);
        assert!((scored[1].similarity - 0.9939).abs() < 1e-3);
        assert_eq!(scored[2].id, 2);
        assert_eq!(scored[2].similarity, 0.0);
    }

    #[test]
    fn test_top_n_larger_than_store() {
        let ranker = SimilarityRanker::default();
        let ids = ranker.rank(&[0.0, 1.0], &sample_store(), 10).unwrap();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        let ranker = SimilarityRanker::default();
        let ids = ranker.rank(&[1.0, 0.0, 0.0], &VectorStore::empty(), 5).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_zero_top_n_is_invalid() {
        let ranker = SimilarityRanker::default();
        let err = ranker.rank(&[1.0, 0.0], &sample_store(), 0).unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));

        let err = ranker.rank(&[1.0], &VectorStore::empty(), 0).unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));
    }

    #[test]
    fn test_query_dimension_mismatch_is_invalid() {
        let ranker = SimilarityRanker::default();
        let err = ranker.rank(&[1.0, 0.0, 0.0], &sample_store(), 2).unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let store = VectorStore::from_records(vec![
            EmbeddingRecord::new(30, vec![2.0, 0.0]),
            EmbeddingRecord::new(10, vec![0.0, 1.0]),
            EmbeddingRecord::new(20, vec![1.0, 0.0]),
            EmbeddingRecord::new(5, vec![5.0, 0.0]),
        ])
        .unwrap();

        let ranker = SimilarityRanker::default();
        let ids = ranker.rank(&[1.0, 0.0], &store, 4).unwrap();
        assert_eq!(ids, vec![30, 20, 5, 10]);
    }

    #[test]
    fn test_zero_query_ranks_in_insertion_order() {
        let ranker = SimilarityRanker::default();
        let ids = ranker.rank(&[0.0, 0.0], &sample_store(), 3).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_norm_record_scores_between_positive_and_negative() {
        let store = VectorStore::from_records(vec![
            EmbeddingRecord::new(1, vec![-1.0, 0.0]),
            EmbeddingRecord::new(2, vec![0.0, 0.0]),
            EmbeddingRecord::new(3, vec![1.0, 0.0]),
        ])
        .unwrap();

        let scored = SimilarityRanker::default()
            .rank_scored(&[1.0, 0.0], &store, 3)
            .unwrap();
        let ids: Vec<i64> = scored.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(scored[1].similarity, 0.0);
    }

    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let records: Vec<EmbeddingRecord> = (0..200)
            .map(|i| {
                let x = i as f32 * 0.37;
                EmbeddingRecord::new(i, vec![x.sin(), x.cos(), (x * 0.5).sin()])
            })
            .collect();
        let store = VectorStore::from_records(records).unwrap();
        let query = [0.3, -0.2, 0.9];

        let sequential = SimilarityRanker::new(RankerConfig {
            parallel_threshold: usize::MAX,
        })
        .rank(&query, &store, 25)
        .unwrap();
        let parallel = SimilarityRanker::new(RankerConfig {
            parallel_threshold: 1,
        })
        .rank(&query, &store, 25)
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}
