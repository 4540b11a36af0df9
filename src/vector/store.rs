//! The in-memory vector store searched by the ranker.
//!
//! A [`VectorStore`] is built once from corpus rows and is read-only
//! afterwards. Records keep their insertion order, which the ranker uses to
//! break score ties deterministically.

use ahash::AHashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValluError};
use crate::vector::core::vector::Vector;

/// One corpus item and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Corpus item identifier (couplet number).
    pub id: i64,
    /// The decoded embedding.
    pub vector: Vector,
}

impl EmbeddingRecord {
    /// Create a new record.
    pub fn new(id: i64, vector: impl Into<Vector>) -> Self {
        Self {
            id,
            vector: vector.into(),
        }
    }
}

/// Ordered, immutable collection of embedding records.
///
/// Invariants: every vector has the same dimension and ids are unique.
/// Use [`VectorStoreBuilder`] to construct one.
#[derive(Debug, Clone)]
pub struct VectorStore {
    records: Vec<EmbeddingRecord>,
    dimension: Option<usize>,
    loaded_at: DateTime<Utc>,
}

impl VectorStore {
    /// An empty store, used until the first load completes.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            dimension: None,
            loaded_at: Utc::now(),
        }
    }

    /// Start building a new store.
    pub fn builder() -> VectorStoreBuilder {
        VectorStoreBuilder::default()
    }

    /// Build a store from records, failing on the first invariant violation.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = EmbeddingRecord>,
    {
        let mut builder = Self::builder();
        for record in records {
            builder.push(record)?;
        }
        Ok(builder.build())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shared vector dimension, `None` for an empty store.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// When this store was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EmbeddingRecord> {
        self.records.iter()
    }

    /// Look up a record by id.
    pub fn get(&self, id: i64) -> Option<&EmbeddingRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Incremental builder that enforces the store invariants.
#[derive(Debug, Default)]
pub struct VectorStoreBuilder {
    records: Vec<EmbeddingRecord>,
    ids: AHashSet<i64>,
    dimension: Option<usize>,
}

impl VectorStoreBuilder {
    /// Append a record.
    ///
    /// The first record fixes the store dimension. Empty vectors, vectors of
    /// another dimension and duplicate ids are rejected with
    /// [`ValluError::InvalidInput`]; the builder is left unchanged.
    pub fn push(&mut self, record: EmbeddingRecord) -> Result<()> {
        if record.vector.is_empty() {
            return Err(ValluError::invalid_input(format!(
                "record {} has an empty vector",
                record.id
            )));
        }
        if let Some(dimension) = self.dimension {
            record.vector.validate_dimension(dimension)?;
        }
        if self.ids.contains(&record.id) {
            return Err(ValluError::invalid_input(format!(
                "duplicate record id {}",
                record.id
            )));
        }

        self.dimension.get_or_insert(record.vector.dimension());
        self.ids.insert(record.id);
        self.records.push(record);
        Ok(())
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the store.
    pub fn build(self) -> VectorStore {
        VectorStore {
            records: self.records,
            dimension: self.dimension,
            loaded_at: Utc::now(),
        }
    }
}
