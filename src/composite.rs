//! Multi-source knowledge: concurrent fan-out with merge, dedup, and
//! rank.
//!
//! [`CompositeKnowledge`] aggregates several knowledge sources behind
//! the same [`Knowledge`] contract. Adds fan out to every source and
//! gather every outcome (a failing source never hides its siblings'
//! results); retrieval queries every source with the same query and
//! config, joins all partial lists, and merges them.
//!
//! # Merge semantics
//!
//! 1. Deduplicate by document id: the first occurrence wins, walking
//!    sources in registration order and each source's results in rank
//!    order. When the same id surfaces from two sources with different
//!    scores, the earlier source's score is the one kept.
//! 2. Sort descending by score; documents without a score sort last;
//!    ties break by id.
//! 3. No further truncation beyond each source's own `limit` — callers
//!    wanting a strict global top-K truncate the merged list themselves
//!    (see [`limit_documents`](crate::format::limit_documents)).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::error;

use crate::error::{Error, Result};
use crate::knowledge::{BatchReport, Knowledge};
use crate::models::{Document, RetrieveConfig};

/// A knowledge source that aggregates N ≥ 1 underlying sources.
pub struct CompositeKnowledge {
    sources: Vec<Arc<dyn Knowledge>>,
}

impl std::fmt::Debug for CompositeKnowledge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeKnowledge")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl CompositeKnowledge {
    /// # Errors
    ///
    /// `InvalidArgument` when `sources` is empty. Validation happens
    /// here, at construction, not at call time.
    pub fn new(sources: Vec<Arc<dyn Knowledge>>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::InvalidArgument(
                "composite requires at least one knowledge source".into(),
            ));
        }
        Ok(Self { sources })
    }

    /// Number of aggregated sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl Knowledge for CompositeKnowledge {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<BatchReport> {
        let mut merged = BatchReport::default();
        if documents.is_empty() {
            return Ok(merged);
        }
        let outcomes = join_all(
            self.sources
                .iter()
                .map(|source| source.add_documents(documents.clone())),
        )
        .await;
        for (position, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(report) => merged.merge(report),
                Err(err) => {
                    error!(source = position, error = %err, "source failed to add documents");
                    merged.failures.push(format!("source {position}: {err}"));
                }
            }
        }
        Ok(merged)
    }

    async fn retrieve(&self, query: &str, config: &RetrieveConfig) -> Result<Vec<Document>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let partials = join_all(
            self.sources
                .iter()
                .map(|source| source.retrieve(query, config)),
        )
        .await;

        let mut merged: Vec<Document> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for partial in partials {
            // all sources have already run; any failure fails the call
            for doc in partial? {
                if seen.insert(doc.id().to_string()) {
                    merged.push(doc);
                }
            }
        }
        merged.sort_by(compare_score_then_id);
        Ok(merged)
    }
}

/// Descending score, missing scores last, ties by id.
fn compare_score_then_id(a: &Document, b: &Document) -> Ordering {
    match (a.score(), b.score()) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id().cmp(b.id())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id().cmp(b.id()),
    }
}
