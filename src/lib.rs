//! # Vallu
//!
//! Semantic search over a couplet corpus: decode packed embedding blobs,
//! keep them in an in-memory vector store, embed free-text queries and rank
//! the corpus by cosine similarity.
//!
//! ## Features
//!
//! - Tolerant decoding of hex embedding blobs as stored by the corpus
//! - Immutable vector store published by atomic swap
//! - Deferred background loading
//! - Exact, deterministic top-N cosine ranking
//! - Pluggable text embedders (OpenAI-compatible API built in)
//! - Item-number and preset-question shortcuts for search-box input

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod query;
pub mod vector;

pub use config::{EmbedderConfig, EngineConfig};
pub use engine::{Resolution, ResolutionKind, SearchOutcome, SemanticSearchEngine};
pub use error::{Result, ValluError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
