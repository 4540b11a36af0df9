//! Command implementations for the Vallu CLI.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{EmbedderConfig, EngineConfig};
use crate::corpus::{JsonRowSource, parse_related_ids};
use crate::embedding::{NoOpEmbedder, TextEmbedder};
use crate::engine::SemanticSearchEngine;
use crate::error::{Result, ValluError};
use crate::query::PresetCatalog;
use crate::vector::codec::try_decode_embedding;
use crate::vector::loader::build_store;

/// Execute a CLI command.
pub fn execute_command(args: ValluArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_corpus(search_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
        Command::Decode(decode_args) => decode_blob(decode_args.clone(), &args),
        Command::Related(related_args) => show_related(related_args.clone(), &args),
        Command::Presets(presets_args) => list_presets(presets_args.clone(), &args),
    }
}

/// Run a future to completion on a fresh runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Load the corpus and answer one search-box input.
fn search_corpus(args: SearchArgs, cli_args: &ValluArgs) -> Result<()> {
    let start_time = Instant::now();

    let config = match &args.config {
        Some(path) => {
            if cli_args.verbosity() > 1 {
                println!("Loading configuration from: {}", path.display());
            }
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };
    let top_n = args.top_n.unwrap_or(config.default_top_n);

    let mut embedder_config = config.embedder.clone();
    if let Some(api_key) = &args.api_key {
        embedder_config = embedder_config.with_api_key(api_key.clone());
    }
    let embedder = query_embedder(&embedder_config.with_env())?;
    let engine = SemanticSearchEngine::new(embedder, config)?;

    let source = JsonRowSource::new(&args.rows_path);
    let (report, resolution) = block_on(async {
        let report = engine.load_from(&source).await?;
        let resolution = engine.resolve(&args.query, top_n).await?;
        Ok::<_, ValluError>((report, resolution))
    })??;

    info!(
        "Resolved {:?} as {:?} with {} ids",
        args.query,
        resolution.kind,
        resolution.ids.len()
    );

    let result = SearchCommandResult {
        query: args.query,
        kind: resolution.kind,
        ids: resolution.ids,
        records_loaded: report.loaded(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    output_result("Search results", &result, cli_args)
}

/// Embedder for free-text queries.
///
/// Without a credential a [`NoOpEmbedder`] is used, so item numbers and
/// preset questions still resolve and only free text fails.
#[cfg(feature = "embeddings-openai")]
fn query_embedder(config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    use crate::embedding::OpenAITextEmbedder;

    match OpenAITextEmbedder::from_config(config) {
        Ok(embedder) => Ok(Arc::new(embedder)),
        Err(ValluError::MissingCredential(reason)) => {
            debug!("No embedding credential; free-text search is unavailable");
            Ok(Arc::new(NoOpEmbedder::missing_credential(
                reason,
                config.dimension.unwrap_or_default(),
            )))
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(feature = "embeddings-openai"))]
fn query_embedder(config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    Ok(Arc::new(NoOpEmbedder::disabled(
        "free-text search needs an embedder; rebuild with the `embeddings-openai` feature",
        config.dimension.unwrap_or_default(),
    )))
}

/// Load the corpus without publishing it and report what happened.
fn show_stats(args: StatsArgs, cli_args: &ValluArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Reading rows from: {}", args.rows_path.display());
    }

    let source = JsonRowSource::new(&args.rows_path);
    let rows = block_on(source.read_all())??;
    let rows_read = rows.len();
    let report = build_store(rows);
    debug!("Built store with {} records", report.loaded());

    let stats = StoreStats {
        rows_path: args.rows_path.display().to_string(),
        rows_read,
        records_loaded: report.loaded(),
        rows_skipped: report.skipped.len(),
        dimension: report.store.dimension(),
        loaded_at: report.store.loaded_at().to_rfc3339(),
        skipped: args.skipped.then_some(report.skipped),
    };

    output_result("Corpus statistics", &stats, cli_args)
}

/// Decode one embedding blob.
fn decode_blob(args: DecodeArgs, cli_args: &ValluArgs) -> Result<()> {
    let values = try_decode_embedding(&args.blob)?;
    let result = DecodeResult {
        dimension: values.len(),
        values,
    };

    output_result("Decoded embedding", &result, cli_args)
}

/// Show the related items recorded for one item.
fn show_related(args: RelatedArgs, cli_args: &ValluArgs) -> Result<()> {
    let source = JsonRowSource::new(&args.rows_path);
    let row = block_on(source.find(args.id))??
        .ok_or_else(|| ValluError::invalid_input(format!("no row with id {}", args.id)))?;

    let result = RelatedResult {
        id: row.id,
        related: row
            .related_rows
            .as_deref()
            .map(parse_related_ids)
            .unwrap_or_default(),
    };

    output_result("Related items", &result, cli_args)
}

/// List the preset questions, optionally for one category.
fn list_presets(args: PresetsArgs, cli_args: &ValluArgs) -> Result<()> {
    let catalog = PresetCatalog::default();
    let presets = catalog
        .presets()
        .iter()
        .filter(|preset| {
            args.category
                .as_deref()
                .is_none_or(|category| preset.category.eq_ignore_ascii_case(category.trim()))
        })
        .cloned()
        .collect::<Vec<_>>();

    if presets.is_empty()
        && let Some(category) = &args.category
    {
        return Err(ValluError::invalid_input(format!(
            "unknown category {category:?}; known categories: {}",
            catalog.categories().join(", ")
        )));
    }

    output_result("Preset questions", &PresetListing { presets }, cli_args)
}
