//! Vector index abstraction.
//!
//! The [`VectorIndex`] trait defines the storage contract the retrieval
//! pipeline runs against, enabling pluggable backends (the in-memory
//! index here, networked vector databases elsewhere). A networked
//! backend must map its own errors into the same
//! [`Error`](crate::error::Error) taxonomy and bootstrap its collection
//! (ensure-exists-or-create with the configured metric and
//! dimensionality) before first use.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

pub use memory::InMemoryIndex;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SearchHit;

/// Abstract vector storage keyed by opaque string identifiers.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Store `vector` under `id`, replacing any existing entry.
    ///
    /// Returns the id. Fails `InvalidArgument` on an empty id and
    /// `DimensionMismatch` when `vector.len() != dimensions()`.
    async fn add(&self, id: &str, vector: &[f32]) -> Result<String>;

    /// The `top_k` nearest entries by descending similarity.
    ///
    /// An empty index yields an empty sequence, not an error. Fails
    /// `DimensionMismatch` / `InvalidArgument` symmetrically to
    /// [`add`](VectorIndex::add).
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>>;

    /// Remove `id`, returning whether a vector was actually removed.
    /// Idempotent.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Dimensionality fixed at construction; never changes.
    fn dimensions(&self) -> usize;
}
