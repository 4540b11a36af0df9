//! Cosine similarity between dense vectors.

use rayon::prelude::*;

use crate::error::{Result, ValluError};

/// Cosine similarity of `a` and `b`.
///
/// Returns `dot(a, b) / (|a| * |b|)`. When either norm is zero the similarity
/// is undefined and scored as `0.0`; the same holds for a non-finite result.
/// A zero score is neutral, not the lowest rank: a zero-norm record ranks
/// below every positive match and above every negative one.
/// Vectors of different lengths are rejected, never truncated.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ValluError::invalid_input(format!(
            "Vector dimensions must match for similarity calculation: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot_product / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        Ok(similarity)
    } else {
        Ok(0.0)
    }
}

/// Cosine similarities between a query vector and many vectors.
///
/// Below `parallel_threshold` vectors the scores are computed sequentially,
/// otherwise with rayon. Output order always matches `vectors`.
pub fn batch_cosine_similarity(
    query: &[f32],
    vectors: &[&[f32]],
    parallel_threshold: usize,
) -> Result<Vec<f32>> {
    if vectors.is_empty() {
        return Ok(Vec::new());
    }

    if vectors.len() < parallel_threshold {
        return vectors
            .iter()
            .map(|v| cosine_similarity(query, v))
            .collect::<Result<Vec<_>>>();
    }

    vectors
        .par_iter()
        .map(|v| cosine_similarity(query, v))
        .collect::<Result<Vec<_>>>()
}
