//! The semantic search service.
//!
//! [`SemanticSearchEngine`] owns everything a search needs: the text
//! embedder, the configuration, the preset catalog and the currently
//! published [`VectorStore`]. It is constructed once at startup and shared
//! by handle (`Arc`), never through a global.
//!
//! The store starts empty. A load builds a complete new store off to the
//! side and then swaps it in under a short write lock; searches take an
//! `Arc` snapshot, so they see either the old store or the new one, never a
//! partially filled one.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vallu::config::EngineConfig;
//! use vallu::corpus::JsonRowSource;
//! use vallu::embedding::OpenAITextEmbedder;
//! use vallu::engine::SemanticSearchEngine;
//!
//! # async fn example() -> vallu::error::Result<()> {
//! let config = EngineConfig::default();
//! let embedder = OpenAITextEmbedder::from_config(&config.embedder.clone().with_env())?;
//! let engine = Arc::new(SemanticSearchEngine::new(Arc::new(embedder), config)?);
//!
//! let source = Arc::new(JsonRowSource::new("corpus.jsonl"));
//! engine.spawn_deferred_load(source).await.expect("load task panicked")?;
//!
//! let ids = engine.search("What is true friendship?", 5).await?;
//! println!("{ids:?}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, ValluError};
use crate::query::{PresetCatalog, SearchQuery};
use crate::vector::loader::{CorpusRow, LoadReport, RowSource, build_store};
use crate::vector::search::ranker::validate_top_n;
use crate::vector::search::{ScoredId, SimilarityRanker};
use crate::vector::store::VectorStore;

/// Result of a search that never fails outright.
///
/// On failure `ids` is empty and `error` describes what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Ranked item ids, best first.
    pub ids: Vec<i64>,
    /// Error description when the search failed.
    pub error: Option<String>,
}

impl SearchOutcome {
    /// Whether the search completed without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// How a search-box input was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    /// The input was blank.
    Empty,
    /// The input was an item number.
    Id,
    /// The input matched a preset question.
    Preset,
    /// The input went through semantic search.
    Semantic,
}

/// Answer to a search-box input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: ResolutionKind,
    pub ids: Vec<i64>,
}

/// Embedding-backed nearest neighbour search over the corpus.
pub struct SemanticSearchEngine {
    config: EngineConfig,
    embedder: Arc<dyn TextEmbedder>,
    ranker: SimilarityRanker,
    presets: PresetCatalog,
    store: RwLock<Arc<VectorStore>>,
}

impl SemanticSearchEngine {
    /// Create an engine with an empty store and the default preset catalog.
    pub fn new(embedder: Arc<dyn TextEmbedder>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ranker: SimilarityRanker::new(config.ranker_config()),
            config,
            embedder,
            presets: PresetCatalog::default(),
            store: RwLock::new(Arc::new(VectorStore::empty())),
        })
    }

    /// Replace the preset catalog.
    pub fn with_presets(mut self, presets: PresetCatalog) -> Self {
        self.presets = presets;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The preset catalog.
    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    /// The embedder used for queries.
    pub fn embedder(&self) -> &Arc<dyn TextEmbedder> {
        &self.embedder
    }

    /// Snapshot of the currently published store.
    pub fn store(&self) -> Arc<VectorStore> {
        self.store.read().clone()
    }

    /// Publish `store`, returning the one it replaces.
    pub fn publish(&self, store: Arc<VectorStore>) -> Arc<VectorStore> {
        let mut guard = self.store.write();
        std::mem::replace(&mut *guard, store)
    }

    /// Build a store from `rows` and publish it, replacing the current one.
    pub fn load_store<I>(&self, rows: I) -> LoadReport
    where
        I: IntoIterator<Item = CorpusRow>,
    {
        let report = build_store(rows);
        self.publish(report.store.clone());
        info!(
            "Published vector store: {} records, {} rows skipped",
            report.loaded(),
            report.skipped.len()
        );
        report
    }

    /// Fetch rows from `source` and publish a new store built from them.
    ///
    /// When the source fails the current store stays published.
    pub async fn load_from(&self, source: &dyn RowSource) -> Result<LoadReport> {
        let rows = source.fetch_rows().await.inspect_err(|e| {
            warn!("Failed to load rows from {}: {}", source.name(), e);
        })?;
        Ok(self.load_store(rows))
    }

    /// Load from `source` in a background task after the configured delay.
    ///
    /// Until the task completes searches see the previous (initially empty)
    /// store. Dropping the handle does not cancel the load; aborting it does.
    pub fn spawn_deferred_load(
        self: &Arc<Self>,
        source: Arc<dyn RowSource>,
    ) -> JoinHandle<Result<LoadReport>> {
        let engine = Arc::clone(self);
        let delay = Duration::from_millis(self.config.load_delay_ms);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            engine.load_from(source.as_ref()).await
        })
    }

    /// Rank the published store against a caller-supplied vector.
    pub fn rank(&self, query: &[f32], top_n: usize) -> Result<Vec<i64>> {
        self.ranker.rank(query, &self.store(), top_n)
    }

    /// Embed `text` and return the best `top_n` matches with their scores.
    ///
    /// # Errors
    ///
    /// - [`ValluError::InvalidInput`] for a zero `top_n` or an embedding whose
    ///   dimension does not match the store
    /// - [`ValluError::InvalidInput`] for blank text, checked before the
    ///   embedder is called; [`resolve`](Self::resolve) answers blank input
    ///   with an empty result instead
    /// - [`ValluError::Embed`] when the embedding service fails
    pub async fn search_scored(&self, text: &str, top_n: usize) -> Result<Vec<ScoredId>> {
        validate_top_n(top_n)?;
        if text.trim().is_empty() {
            return Err(ValluError::invalid_input("query text must not be empty"));
        }

        let store = self.store();
        if store.is_empty() {
            debug!("Vector store is empty; returning no results");
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(text).await?;
        let scored = self.ranker.rank_scored(query.as_slice(), &store, top_n)?;
        debug!(
            "Semantic search with {} returned {} of {} records",
            self.embedder.name(),
            scored.len(),
            store.len()
        );
        Ok(scored)
    }

    /// Embed `text` and return the ids of the best `top_n` matches.
    pub async fn search(&self, text: &str, top_n: usize) -> Result<Vec<i64>> {
        Ok(self
            .search_scored(text, top_n)
            .await?
            .into_iter()
            .map(|scored| scored.id)
            .collect())
    }

    /// Like [`search`](Self::search), but failures become an empty result
    /// carrying the error description.
    pub async fn search_outcome(&self, text: &str, top_n: usize) -> SearchOutcome {
        match self.search(text, top_n).await {
            Ok(ids) => SearchOutcome { ids, error: None },
            Err(e) => {
                warn!("Search failed: {e}");
                SearchOutcome {
                    ids: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Answer raw search-box input.
    ///
    /// Blank input yields nothing, an item number yields itself, a preset
    /// question yields its curated ids (at most `top_n`), anything else goes
    /// through semantic search.
    pub async fn resolve(&self, input: &str, top_n: usize) -> Result<Resolution> {
        validate_top_n(top_n)?;

        let resolution = match SearchQuery::parse(input) {
            SearchQuery::Empty => Resolution {
                kind: ResolutionKind::Empty,
                ids: Vec::new(),
            },
            SearchQuery::ById(id) => Resolution {
                kind: ResolutionKind::Id,
                ids: vec![id],
            },
            SearchQuery::Text(text) => match self.presets.lookup(&text) {
                Some(preset) => Resolution {
                    kind: ResolutionKind::Preset,
                    ids: preset.ids.iter().copied().take(top_n).collect(),
                },
                None => Resolution {
                    kind: ResolutionKind::Semantic,
                    ids: self.search(&text, top_n).await?,
                },
            },
        };
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::EmbedFailure;
    use crate::vector::Vector;
    use crate::vector::codec::encode_embedding;

    /// Embeds every text as the same vector.
    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl TextEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vector> {
            Ok(Vector::new(self.0.clone()))
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl TextEmbedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vector> {
            Err(ValluError::embed(EmbedFailure::Network, "connection refused"))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn rows() -> Vec<CorpusRow> {
        vec![
            CorpusRow::new(1, encode_embedding(&[1.0, 0.0])),
            CorpusRow::new(2, encode_embedding(&[0.0, 1.0])),
            CorpusRow::new(3, encode_embedding(&[0.9, 0.1])),
        ]
    }

    fn engine(embedder: impl TextEmbedder + 'static) -> SemanticSearchEngine {
        SemanticSearchEngine::new(Arc::new(embedder), EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_search_ranks_loaded_store() {
        let engine = engine(FixedEmbedder(vec![1.0, 0.0]));
        let report = engine.load_store(rows());
        assert_eq!(report.loaded(), 3);

        assert_eq!(engine.search("anything", 2).await.unwrap(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_search_before_load_is_empty() {
        let engine = engine(FixedEmbedder(vec![1.0, 0.0]));
        assert!(engine.search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let engine = engine(FixedEmbedder(vec![1.0, 0.0]));
        engine.load_store(rows());

        let err = engine.search("anything", 0).await.unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));
        let err = engine.search("   ", 3).await.unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));

        let mismatched = engine_with_dimension_three();
        mismatched.load_store(rows());
        let err = mismatched.search("anything", 3).await.unwrap_err();
        assert!(matches!(err, ValluError::InvalidInput(_)));
    }

    fn engine_with_dimension_three() -> SemanticSearchEngine {
        engine(FixedEmbedder(vec![1.0, 0.0, 0.0]))
    }

    #[tokio::test]
    async fn test_embed_failure_leaves_store_untouched() {
        let engine = engine(FailingEmbedder);
        engine.load_store(rows());
        let before = engine.store();

        let outcome = engine.search_outcome("anything", 5).await;
        assert!(outcome.ids.is_empty());
        assert!(!outcome.is_ok());
        assert!(outcome.error.unwrap().contains("connection refused"));
        assert!(Arc::ptr_eq(&before, &engine.store()));
    }

    #[tokio::test]
    async fn test_reload_replaces_store_wholesale() {
        let engine = engine(FixedEmbedder(vec![1.0, 0.0]));
        engine.load_store(rows());
        let first = engine.store();

        engine.load_store(vec![CorpusRow::new(7, encode_embedding(&[0.0, 1.0]))]);
        assert_eq!(first.len(), 3);
        assert_eq!(engine.store().len(), 1);
        assert_eq!(engine.search("anything", 5).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_resolve_dispatch() {
        let engine = engine(FixedEmbedder(vec![0.0, 1.0]));
        engine.load_store(rows());

        let resolution = engine.resolve("   ", 5).await.unwrap();
        assert_eq!(resolution.kind, ResolutionKind::Empty);
        assert!(resolution.ids.is_empty());

        let resolution = engine.resolve("1081", 5).await.unwrap();
        assert_eq!(resolution.kind, ResolutionKind::Id);
        assert_eq!(resolution.ids, vec![1081]);

        let resolution = engine
            .resolve("What advice does Thirukural offer for managing finances?", 3)
            .await
            .unwrap();
        assert_eq!(resolution.kind, ResolutionKind::Preset);
        assert_eq!(resolution.ids, vec![333, 512, 657]);

        let resolution = engine.resolve("on rain", 1).await.unwrap();
        assert_eq!(resolution.kind, ResolutionKind::Semantic);
        assert_eq!(resolution.ids, vec![2]);

        assert!(engine.resolve("on rain", 0).await.is_err());
    }

    #[test]
    fn test_rank_uses_published_store() {
        let engine = engine(FailingEmbedder);
        assert!(engine.rank(&[1.0, 0.0], 2).unwrap().is_empty());

        engine.load_store(rows());
        assert_eq!(engine.rank(&[1.0, 0.0], 2).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            default_top_n: 0,
            ..EngineConfig::default()
        };
        let result = SemanticSearchEngine::new(Arc::new(FailingEmbedder), config);
        assert!(matches!(result, Err(ValluError::InvalidConfig(_))));
    }
}
