//! Dense vector storage and cosine nearest-neighbour search.
//!
//! # Module Structure
//!
//! - `core`: Core data structures (vector, cosine similarity)
//! - `codec`: Hex blob decoding of stored embeddings
//! - `store`: The immutable, ordered in-memory vector store
//! - `loader`: Builds a store from raw corpus rows
//! - `search`: Similarity ranking over a store

pub mod codec;
pub mod core;
pub mod loader;
pub mod search;
pub mod store;

pub use self::core::vector::Vector;
pub use self::store::{EmbeddingRecord, VectorStore};
