//! In-memory [`VectorIndex`] implementation.
//!
//! Entries live in an insertion-ordered `Vec` behind
//! `std::sync::RwLock` for thread safety. Search is a brute-force
//! cosine-similarity scan over all stored vectors — O(n·dim) per query,
//! no indexing structure — with a stable descending sort so equal
//! scores keep insertion order and repeated queries return identical
//! orderings.

use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::error::{Error, Result};
use crate::models::SearchHit;

use super::VectorIndex;

pub const DEFAULT_DIMENSIONS: usize = 1024;

struct StoredVector {
    id: String,
    vector: Vec<f32>,
}

/// Exact-scan in-memory vector index.
///
/// The key→vector map is the only mutable shared state in the core; it
/// is safe for concurrent readers and writers without external locking.
/// A search started after an `add` completes observes that vector.
pub struct InMemoryIndex {
    entries: RwLock<Vec<StoredVector>>,
    dimensions: usize,
}

impl InMemoryIndex {
    /// # Errors
    ///
    /// `InvalidArgument` when `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::InvalidArgument("dimensions must be positive".into()));
        }
        Ok(Self {
            entries: RwLock::new(Vec::new()),
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn add(&self, id: &str, vector: &[f32]) -> Result<String> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("id cannot be empty".into()));
        }
        self.check_dimensions(vector)?;
        let mut entries = self.entries.write().unwrap();
        // defensive copy; re-adding an id keeps its insertion position
        match entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.vector = vector.to_vec(),
            None => entries.push(StoredVector {
                id: id.to_string(),
                vector: vector.to_vec(),
            }),
        }
        Ok(id.to_string())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        self.check_dimensions(query)?;
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be positive".into()));
        }
        let entries = self.entries.read().unwrap();
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let mut hits = entries
            .iter()
            .map(|entry| {
                SearchHit::new(
                    entry.id.as_str(),
                    f64::from(cosine_similarity(query, &entry.vector)),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        // sort_by is stable: ties keep insertion order
        hits.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        Ok(entries.len() != before)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
