//! Text embedding trait used by the search engine.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::core::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// The search engine only needs `embed`: a function from free text to a
/// fixed-length vector, or a failure. Implementations must be cheap to share
/// across tasks (`Send + Sync`); the engine holds them behind an `Arc`.
///
/// Failures should be reported as [`crate::error::ValluError::Embed`] so the
/// engine can surface them to the caller without touching its store.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to embed
    ///
    /// # Returns
    ///
    /// A vector representation of the input text
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder.
    ///
    /// This is useful for logging and debugging purposes.
    fn name(&self) -> &str {
        "unknown"
    }
}
