//! Single-source knowledge base: one embedding provider + one vector index.
//!
//! [`SimpleKnowledge`] is the document-level surface over the embedding
//! and storage layers. The add-path embeds each document's content,
//! attaches the vector, inserts it into the index, and caches the
//! document by id so query hits can be hydrated back into full
//! documents. The query path embeds the query, searches the index,
//! filters by score threshold, and returns scored copies of the cached
//! originals.
//!
//! Per-item failures during a batch add are skipped, not fatal: the
//! outcome of every item is captured in a [`BatchReport`] so callers
//! (and tests) can see exactly what was added and what was skipped and
//! why. Callers needing all-or-nothing batch semantics must wrap calls
//! accordingly.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::models::{Content, Document, RetrieveConfig};
use crate::store::VectorIndex;

/// Document-level contract shared by single and composite sources.
///
/// This is the only surface exposed to consumers of the retrieval core
/// (tool layers, injection hooks): add documents, retrieve by query.
#[async_trait]
pub trait Knowledge: Send + Sync {
    /// Embed and index a batch of documents.
    ///
    /// An empty batch is a no-op success. Per-item failures are
    /// recorded in the report and do not abort the batch.
    async fn add_documents(&self, documents: Vec<Document>) -> Result<BatchReport>;

    /// Ranked, threshold-filtered documents matching `query`.
    ///
    /// A blank query yields an empty list without invoking the
    /// embedding provider or the index. Embedding or index failures
    /// fail the whole call; there is no partial-result fallback.
    async fn retrieve(&self, query: &str, config: &RetrieveConfig) -> Result<Vec<Document>>;
}

/// Per-item outcome of a batch add.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ids successfully embedded and indexed, in input order.
    pub added: Vec<String>,
    /// Documents skipped after a per-item failure.
    pub skipped: Vec<SkippedDocument>,
    /// Whole-source failures (composite fan-out only).
    pub failures: Vec<String>,
}

/// A document dropped from a batch, with the reason it was dropped.
#[derive(Debug)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: String,
}

impl BatchReport {
    /// True when every item in the batch landed.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }

    pub(crate) fn merge(&mut self, other: BatchReport) {
        self.added.extend(other.added);
        self.skipped.extend(other.skipped);
        self.failures.extend(other.failures);
    }
}

/// A knowledge source backed by one embedding provider and one vector
/// index.
///
/// The provider reference is shared (one provider may serve several
/// sources); the index and the hydration cache are owned.
pub struct SimpleKnowledge {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    cache: RwLock<HashMap<String, Document>>,
}

impl std::fmt::Debug for SimpleKnowledge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleKnowledge").finish_non_exhaustive()
    }
}

impl SimpleKnowledge {
    /// # Errors
    ///
    /// `DimensionMismatch` when the provider and index disagree on
    /// vector dimensionality.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Result<Self> {
        if provider.dimensions() != index.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: index.dimensions(),
                actual: provider.dimensions(),
            });
        }
        Ok(Self {
            provider,
            index,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Number of documents held for hydration.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().unwrap().is_empty()
    }

    /// Drop all cached documents. The index is left untouched.
    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
    }
}

#[async_trait]
impl Knowledge for SimpleKnowledge {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        if documents.is_empty() {
            return Ok(report);
        }

        // Embed concurrently, then insert in input order so equal-score
        // search results keep a deterministic tie-break.
        let embeddings =
            join_all(documents.iter().map(|doc| self.provider.embed(doc.content()))).await;

        for (doc, embedded) in documents.into_iter().zip(embeddings) {
            let embedding = match embedded {
                Ok(embedding) => embedding,
                Err(err) => {
                    warn!(id = %doc.id(), error = %err, "skipping document: embedding failed");
                    report.skipped.push(SkippedDocument {
                        id: doc.id().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match self.index.add(doc.id(), &embedding).await {
                Ok(id) => {
                    let doc = doc.with_embedding(embedding);
                    self.cache.write().unwrap().insert(id.clone(), doc);
                    report.added.push(id);
                }
                Err(err) => {
                    warn!(id = %doc.id(), error = %err, "skipping document: index add failed");
                    report.skipped.push(SkippedDocument {
                        id: doc.id().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    async fn retrieve(&self, query: &str, config: &RetrieveConfig) -> Result<Vec<Document>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(&Content::text(query)).await?;
        let hits = self.index.search(&query_embedding, config.limit()).await?;

        let mut results: Vec<Document> = {
            let cache = self.cache.read().unwrap();
            hits.iter()
                .filter(|hit| hit.score() >= config.score_threshold())
                .filter_map(|hit| match cache.get(hit.id()) {
                    Some(doc) => Some(doc.with_score(hit.score())),
                    None => {
                        warn!(id = %hit.id(), "dropping hit: document missing from cache");
                        None
                    }
                })
                .collect()
        };
        results.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }
}
