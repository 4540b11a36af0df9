//! Vector search module for ranking a store against a query vector.
//!
//! This module handles exact nearest neighbour search by cosine similarity
//! over the whole in-memory store.

pub mod ranker;

pub use self::ranker::{RankerConfig, ScoredId, SimilarityRanker};
