//! Core data structures for vector search.
//!
//! This module contains the vector representation and the cosine similarity
//! measure used by the ranker.

pub mod distance;
pub mod vector;
