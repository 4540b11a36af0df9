//! Building a [`VectorStore`] from raw corpus rows.
//!
//! Rows come from a [`RowSource`]. Each row's embedding blob is decoded with
//! [`try_decode_embedding`]; rows that cannot contribute a record are skipped
//! and reported, never fatal. Only a failure of the source itself aborts a
//! load.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vector::codec::try_decode_embedding;
use crate::vector::store::{EmbeddingRecord, VectorStore};

/// A raw corpus row as read from the couplet table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    /// Item identifier.
    #[serde(alias = "kno")]
    pub id: i64,
    /// Packed embedding blob, absent when the item was never embedded.
    #[serde(default)]
    pub embeddings: Option<String>,
    /// Comma separated list of related item ids.
    #[serde(default)]
    pub related_rows: Option<String>,
}

impl CorpusRow {
    /// Create a row with an embedding blob.
    pub fn new(id: i64, embeddings: impl Into<String>) -> Self {
        Self {
            id,
            embeddings: Some(embeddings.into()),
            related_rows: None,
        }
    }

    /// Create a row without an embedding blob.
    pub fn without_embedding(id: i64) -> Self {
        Self {
            id,
            embeddings: None,
            related_rows: None,
        }
    }
}

/// Supplier of corpus rows.
///
/// Implementations issue the equivalent of
/// `SELECT id, embeddings FROM ... WHERE embeddings IS NOT NULL`; rows may be
/// returned in any order. A source that cannot be reached fails with
/// [`crate::error::ValluError::Load`].
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch every row that carries an embedding.
    async fn fetch_rows(&self) -> Result<Vec<CorpusRow>>;

    /// Human readable name used in logs.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Why a row did not make it into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The row had no embedding blob.
    MissingEmbedding,
    /// The blob could not be decoded.
    Undecodable(String),
    /// The decoded vector broke a store invariant (dimension, duplicate id).
    Rejected(String),
}

/// A row skipped during loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub id: i64,
    pub reason: SkipReason,
}

/// Outcome of one load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The freshly built store.
    pub store: Arc<VectorStore>,
    /// Rows that were skipped, in input order.
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    /// Number of records in the built store.
    pub fn loaded(&self) -> usize {
        self.store.len()
    }
}

/// Decode `rows` into a new store.
///
/// The first decodable row fixes the store dimension.
pub fn build_store<I>(rows: I) -> LoadReport
where
    I: IntoIterator<Item = CorpusRow>,
{
    let mut builder = VectorStore::builder();
    let mut skipped = Vec::new();

    for row in rows {
        let Some(blob) = row.embeddings.as_deref() else {
            debug!("Skipping row {}: no embedding", row.id);
            skipped.push(SkippedRow {
                id: row.id,
                reason: SkipReason::MissingEmbedding,
            });
            continue;
        };

        let values = match try_decode_embedding(blob) {
            Ok(values) => values,
            Err(e) => {
                warn!("Failed to process embedding for row {}: {}", row.id, e);
                skipped.push(SkippedRow {
                    id: row.id,
                    reason: SkipReason::Undecodable(e.to_string()),
                });
                continue;
            }
        };

        if let Err(e) = builder.push(EmbeddingRecord::new(row.id, values)) {
            warn!("Rejected embedding for row {}: {}", row.id, e);
            skipped.push(SkippedRow {
                id: row.id,
                reason: SkipReason::Rejected(e.to_string()),
            });
        }
    }

    LoadReport {
        store: Arc::new(builder.build()),
        skipped,
    }
}
