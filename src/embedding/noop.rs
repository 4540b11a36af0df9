//! Placeholder embedder for engines that run without an embedding service.
//!
//! Item-number and preset-question input never reach the embedder, so an
//! engine can still answer them when no service is configured. A
//! [`NoOpEmbedder`] stands in for the real one and reports why it cannot
//! embed only when free text is actually searched.

use async_trait::async_trait;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, ValluError};
use crate::vector::core::vector::Vector;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Unavailable {
    MissingCredential,
    Disabled,
}

/// A text embedder that fails every `embed` call.
///
/// ```
/// use vallu::embedding::TextEmbedder;
/// use vallu::embedding::noop::NoOpEmbedder;
///
/// let embedder = NoOpEmbedder::missing_credential("no API key configured", 1536);
/// assert_eq!(embedder.dimension(), 1536);
/// assert_eq!(embedder.name(), "noop");
/// ```
#[derive(Debug, Clone)]
pub struct NoOpEmbedder {
    cause: Unavailable,
    reason: String,
    dimension: usize,
}

impl NoOpEmbedder {
    /// Embedding fails with [`ValluError::MissingCredential`].
    pub fn missing_credential<S: Into<String>>(reason: S, dimension: usize) -> Self {
        Self {
            cause: Unavailable::MissingCredential,
            reason: reason.into(),
            dimension,
        }
    }

    /// Embedding fails with [`ValluError::Other`], e.g. when no embedder
    /// backend was compiled in.
    pub fn disabled<S: Into<String>>(reason: S, dimension: usize) -> Self {
        Self {
            cause: Unavailable::Disabled,
            reason: reason.into(),
            dimension,
        }
    }
}

#[async_trait]
impl TextEmbedder for NoOpEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(match self.cause {
            Unavailable::MissingCredential => ValluError::missing_credential(self.reason.clone()),
            Unavailable::Disabled => ValluError::other(self.reason.clone()),
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_reports_cause() {
        let err = NoOpEmbedder::missing_credential("no key", 2)
            .embed("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, ValluError::MissingCredential(_)));

        let err = NoOpEmbedder::disabled("not compiled in", 2)
            .embed("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, ValluError::Other(_)));
    }
}
