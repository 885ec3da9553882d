//! Embedding similarity.

use crate::error::{MlError, MlResult};

/// Cosine similarity of two embeddings, in [-1, 1].
///
/// A zero vector has no direction and scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> MlResult<f64> {
    if a.len() != b.len() {
        return Err(MlError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
