//! Corpus row sources and helpers for the couplet table.
//!
//! The reader application keeps its corpus in an embedded analytical
//! database. This crate does not embed that engine; instead rows are exported
//! to JSON (an array or one object per line) and read through
//! [`JsonRowSource`]. Any other backend can implement
//! [`RowSource`](crate::vector::loader::RowSource) directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::error::{Result, ValluError};
use crate::vector::loader::{CorpusRow, RowSource};

/// Reads corpus rows from a JSON or JSON-lines file.
#[derive(Debug, Clone)]
pub struct JsonRowSource {
    path: PathBuf,
    name: String,
}

impl JsonRowSource {
    /// Create a source for the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Read every row, including rows without an embedding.
    pub async fn read_all(&self) -> Result<Vec<CorpusRow>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ValluError::load(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        parse_rows(&content)
            .map_err(|e| ValluError::load(format!("failed to parse {}: {}", self.path.display(), e)))
    }

    /// Find one row by id.
    pub async fn find(&self, id: i64) -> Result<Option<CorpusRow>> {
        Ok(self.read_all().await?.into_iter().find(|row| row.id == id))
    }
}

#[async_trait]
impl RowSource for JsonRowSource {
    async fn fetch_rows(&self) -> Result<Vec<CorpusRow>> {
        let rows: Vec<CorpusRow> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|row| row.embeddings.is_some())
            .collect();
        debug!("Read {} embedded rows from {}", rows.len(), self.name);
        Ok(rows)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse a JSON array of rows, or JSON lines when the content is not an array.
fn parse_rows(content: &str) -> Result<Vec<CorpusRow>> {
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(content)?);
    }

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<CorpusRow>(line).map_err(ValluError::from))
        .collect()
}

/// Parse a `related_rows` value such as `"[12, 7,  3]"` into ids.
///
/// Brackets are ignored; blank and non-numeric parts are dropped.
///
/// ```
/// use vallu::corpus::parse_related_ids;
///
/// assert_eq!(parse_related_ids("[12, 7,  3]"), vec![12, 7, 3]);
/// assert!(parse_related_ids("").is_empty());
/// ```
pub fn parse_related_ids(related_rows: &str) -> Vec<i64> {
    related_rows
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '[' || c == ']').trim())
        .filter_map(|part| part.parse::<i64>().ok())
        .collect()
}
