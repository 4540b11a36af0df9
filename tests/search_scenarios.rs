use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use vallu::config::EngineConfig;
use vallu::corpus::JsonRowSource;
use vallu::embedding::TextEmbedder;
use vallu::engine::{ResolutionKind, SemanticSearchEngine};
use vallu::error::{Result, ValluError};
use vallu::vector::Vector;
use vallu::vector::codec::encode_embedding;
use vallu::vector::loader::{CorpusRow, RowSource};

/// Maps a few known phrases to fixed vectors.
struct PhraseEmbedder;

#[async_trait]
impl TextEmbedder for PhraseEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let data = match text {
            "rain" => vec![0.0, 1.0],
            _ => vec![1.0, 0.0],
        };
        Ok(Vector::new(data))
    }

    fn dimension(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "phrase"
    }
}

struct StaticSource(Vec<CorpusRow>);

#[async_trait]
impl RowSource for StaticSource {
    async fn fetch_rows(&self) -> Result<Vec<CorpusRow>> {
        Ok(self.0.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl RowSource for BrokenSource {
    async fn fetch_rows(&self) -> Result<Vec<CorpusRow>> {
        Err(ValluError::load("database is locked"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn sample_rows() -> Vec<CorpusRow> {
    vec![
        CorpusRow::new(1, format!("Optional(x'{}')", encode_embedding(&[1.0, 0.0]))),
        CorpusRow::new(2, encode_embedding(&[0.0, 1.0])),
        CorpusRow::new(3, format!("X'{}'", encode_embedding(&[0.9, 0.1]))),
        CorpusRow::without_embedding(4),
        CorpusRow::new(5, "not hex at all"),
    ]
}

fn engine_with_delay(load_delay_ms: u64) -> Result<Arc<SemanticSearchEngine>> {
    let config = EngineConfig {
        load_delay_ms,
        ..EngineConfig::default()
    };
    Ok(Arc::new(SemanticSearchEngine::new(
        Arc::new(PhraseEmbedder),
        config,
    )?))
}

#[tokio::test]
async fn search_ranks_by_cosine_similarity() -> Result<()> {
    let engine = engine_with_delay(0)?;
    let report = engine.load_from(&StaticSource(sample_rows())).await?;
    assert_eq!(report.loaded(), 3);
    assert_eq!(report.skipped.len(), 2);

    assert_eq!(engine.search("friendship", 2).await?, vec![1, 3]);
    assert_eq!(engine.search("rain", 1).await?, vec![2]);

    let scored = engine.search_scored("friendship", 5).await?;
    assert_eq!(scored.len(), 3);
    assert!((scored[0].similarity - 1.0).abs() < 1e-6);
    assert!(scored.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    Ok(())
}

#[tokio::test]
async fn deferred_load_publishes_after_delay() -> Result<()> {
    let engine = engine_with_delay(200)?;
    let handle = engine.spawn_deferred_load(Arc::new(StaticSource(sample_rows())));

    assert!(engine.store().is_empty());
    assert!(engine.search("friendship", 5).await?.is_empty());

    let report = handle.await.expect("load task panicked")?;
    assert_eq!(report.loaded(), 3);
    assert_eq!(engine.store().len(), 3);
    assert_eq!(engine.search("friendship", 1).await?, vec![1]);
    Ok(())
}

#[tokio::test]
async fn failed_reload_keeps_previous_store() -> Result<()> {
    let engine = engine_with_delay(0)?;
    engine.load_from(&StaticSource(sample_rows())).await?;
    let before = engine.store();

    let err = engine.load_from(&BrokenSource).await.unwrap_err();
    assert!(matches!(err, ValluError::Load(_)));
    assert!(Arc::ptr_eq(&before, &engine.store()));

    let err = engine
        .spawn_deferred_load(Arc::new(BrokenSource))
        .await
        .expect("load task panicked")
        .unwrap_err();
    assert!(matches!(err, ValluError::Load(_)));
    assert_eq!(engine.search("friendship", 2).await?, vec![1, 3]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn searches_during_reload_see_a_whole_store() -> Result<()> {
    let engine = engine_with_delay(0)?;
    engine.load_store(sample_rows());

    let replacement = vec![
        CorpusRow::new(10, encode_embedding(&[1.0, 0.0])),
        CorpusRow::new(11, encode_embedding(&[0.7, 0.7])),
    ];

    let mut searches = Vec::new();
    for _ in 0..32 {
        let engine = Arc::clone(&engine);
        searches.push(tokio::spawn(async move {
            engine.search("friendship", 2).await
        }));
    }
    engine.load_store(replacement);

    for search in searches {
        let ids = search.await.expect("search task panicked")?;
        assert!(ids == vec![1, 3] || ids == vec![10, 11], "mixed result {ids:?}");
    }
    assert_eq!(engine.search("friendship", 2).await?, vec![10, 11]);
    Ok(())
}

#[tokio::test]
async fn json_corpus_end_to_end() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"{{"kno": 1, "embeddings": "Optional(x'{}')", "related_rows": "[3]"}}"#,
        encode_embedding(&[1.0, 0.0])
    )?;
    writeln!(file, r#"{{"kno": 2, "embeddings": "{}"}}"#, encode_embedding(&[0.0, 1.0]))?;
    writeln!(file, r#"{{"kno": 3, "embeddings": "{}"}}"#, encode_embedding(&[0.9, 0.1]))?;
    writeln!(file, r#"{{"kno": 4, "embeddings": null}}"#)?;

    let engine = engine_with_delay(0)?;
    let report = engine.load_from(&JsonRowSource::new(file.path())).await?;
    assert_eq!(report.loaded(), 3);
    assert!(report.skipped.is_empty());

    let resolution = engine.resolve("friendship", 2).await?;
    assert_eq!(resolution.kind, ResolutionKind::Semantic);
    assert_eq!(resolution.ids, vec![1, 3]);

    let resolution = engine.resolve(" 4 ", 2).await?;
    assert_eq!(resolution.kind, ResolutionKind::Id);
    assert_eq!(resolution.ids, vec![4]);
    Ok(())
}

#[test]
fn search_outcome_reports_errors_without_failing() -> Result<()> {
    let engine = engine_with_delay(0)?;
    engine.load_store(sample_rows());

    let outcome = tokio_test::block_on(engine.search_outcome("friendship", 0));
    assert!(outcome.ids.is_empty());
    assert!(outcome.error.is_some());

    let outcome = tokio_test::block_on(engine.search_outcome("friendship", 1));
    assert!(outcome.is_ok());
    assert_eq!(outcome.ids, vec![1]);
    Ok(())
}
