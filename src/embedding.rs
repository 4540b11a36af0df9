//! Text embedding support for semantic search.
//!
//! Queries are turned into vectors by a [`TextEmbedder`]. The crate ships an
//! implementation backed by an OpenAI-compatible embeddings endpoint; any
//! other provider can be plugged in by implementing the trait.
//!
//! # Feature Flags
//!
//! - `embeddings-openai` - OpenAI API implementation (enabled by default)
//!
//! # Custom Implementation
//!
//! ```
//! use async_trait::async_trait;
//! use vallu::embedding::TextEmbedder;
//! use vallu::error::Result;
//! use vallu::vector::Vector;
//!
//! struct MyEmbedder {
//!     dimension: usize,
//! }
//!
//! #[async_trait]
//! impl TextEmbedder for MyEmbedder {
//!     async fn embed(&self, _text: &str) -> Result<Vector> {
//!         Ok(Vector::new(vec![0.0; self.dimension]))
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         self.dimension
//!     }
//! }
//! ```

pub mod noop;
pub mod text_embedder;

#[cfg(feature = "embeddings-openai")]
pub mod openai_text_embedder;

pub use self::noop::NoOpEmbedder;
pub use self::text_embedder::TextEmbedder;

#[cfg(feature = "embeddings-openai")]
pub use self::openai_text_embedder::OpenAITextEmbedder;
