//! Embedding provider contract and vector math.
//!
//! The core never instantiates a concrete provider; it depends only on
//! the [`EmbeddingProvider`] trait plus the invariant that the provider's
//! dimensionality matches the index it feeds (checked when a
//! [`SimpleKnowledge`](crate::knowledge::SimpleKnowledge) is built).
//! Concrete backends (OpenAI-compatible HTTP, local ONNX runtimes)
//! belong to the embedding application, not this crate.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Content;

/// Trait for embedding providers.
///
/// Implementations must be `Send + Sync`; `embed` may suspend on I/O.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Map one content unit to a fixed-length vector of
    /// [`dimensions`](EmbeddingProvider::dimensions) floats.
    async fn embed(&self, content: &Content) -> Result<Vec<f32>>;

    /// Returns the embedding vector dimensionality (e.g. `1536`).
    fn dimensions(&self) -> usize;

    /// Returns the model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, vectors of different lengths, or
/// when either norm is zero — a policy choice to avoid division by
/// zero, not an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
