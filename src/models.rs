//! Core data types that flow through the retrieval pipeline.
//!
//! A [`Document`] is an immutable content unit produced by the chunker,
//! enriched with an embedding on the add-path, and annotated with a score
//! (on a copy) on the query path. Its identity is content-addressed: the
//! SHA-256 of the extracted text, so identical text collides by design —
//! that collision is what cross-source deduplication keys on.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Content payload of a document: the embeddable unit.
///
/// A tagged union rather than a free-form map, so extraction for
/// embedding and identity hashing is exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Plain text.
    Text { text: String },
    /// Reference to an image by URL; the image bytes are never stored here.
    Image { url: String },
    /// Anything else, carried opaquely.
    Other { data: serde_json::Value },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Content::Image { url: url.into() }
    }

    /// Canonical extracted text for this content unit.
    ///
    /// This is what gets hashed for the document id and handed to the
    /// embedding provider: the text itself, the image URL, or the JSON
    /// rendering of an opaque payload. Two semantically different units
    /// that extract to the same text are indistinguishable — an accepted
    /// tradeoff, not a bug.
    pub fn embeddable_text(&self) -> Cow<'_, str> {
        match self {
            Content::Text { text } => Cow::Borrowed(text),
            Content::Image { url } => Cow::Borrowed(url),
            Content::Other { data } => Cow::Owned(data.to_string()),
        }
    }
}

/// An immutable content unit with chunk coordinates and a
/// content-addressed identity.
///
/// `embedding` is set once by the knowledge-source add-path
/// ([`with_embedding`](Document::with_embedding)); `score` is only ever
/// set on a retrieval-result copy ([`with_score`](Document::with_score)).
/// Stored documents are never mutated after insertion, so concurrent
/// readers cannot observe a half-written annotation.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    content: Content,
    doc_id: String,
    chunk_index: usize,
    chunk_count: usize,
    embedding: Option<Vec<f32>>,
    score: Option<f64>,
}

impl Document {
    /// Create a document for one chunk of a source document.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `doc_id` is empty, `chunk_count` is zero,
    /// or `chunk_index >= chunk_count`.
    pub fn new(
        content: Content,
        doc_id: impl Into<String>,
        chunk_index: usize,
        chunk_count: usize,
    ) -> Result<Self> {
        let doc_id = doc_id.into();
        if doc_id.is_empty() {
            return Err(Error::InvalidArgument("doc_id cannot be empty".into()));
        }
        if chunk_count == 0 {
            return Err(Error::InvalidArgument("chunk_count must be at least 1".into()));
        }
        if chunk_index >= chunk_count {
            return Err(Error::InvalidArgument(format!(
                "chunk_index ({chunk_index}) must be less than chunk_count ({chunk_count})"
            )));
        }
        let id = content_id(&content);
        Ok(Self {
            id,
            content,
            doc_id,
            chunk_index,
            chunk_count,
            embedding: None,
            score: None,
        })
    }

    /// Wrap a chunker output sequence into documents sharing a fresh
    /// `doc_id`, with `chunk_count` set to the sequence length.
    pub fn from_chunks(chunks: Vec<String>) -> Result<Vec<Document>> {
        Self::from_chunks_with_doc_id(chunks, Uuid::new_v4().to_string())
    }

    /// Like [`from_chunks`](Document::from_chunks) with a caller-supplied
    /// grouping key.
    pub fn from_chunks_with_doc_id(
        chunks: Vec<String>,
        doc_id: impl Into<String>,
    ) -> Result<Vec<Document>> {
        let doc_id = doc_id.into();
        let count = chunks.len();
        chunks
            .into_iter()
            .enumerate()
            .map(|(index, text)| Document::new(Content::text(text), doc_id.clone(), index, count))
            .collect()
    }

    /// Content-addressed identity: SHA-256 hex of the extracted text.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Grouping key shared by all chunks of one source document.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// Set on retrieval results only; `None` on stored documents.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Consume and attach the embedding produced for this content.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// A copy of this document annotated with a query score. The
    /// original is left untouched.
    pub fn with_score(&self, score: f64) -> Self {
        let mut copy = self.clone();
        copy.score = Some(score);
        copy
    }
}

fn content_id(content: &Content) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.embeddable_text().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Raw output of a vector-index query, before document hydration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    id: String,
    score: f64,
}

impl SearchHit {
    /// # Errors
    ///
    /// `InvalidArgument` when `id` is empty.
    pub fn new(id: impl Into<String>, score: f64) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidArgument("search hit id cannot be empty".into()));
        }
        Ok(Self { id, score })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Governs both the per-source candidate cutoff and the score filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveConfig {
    limit: usize,
    score_threshold: f64,
}

impl RetrieveConfig {
    /// # Errors
    ///
    /// `InvalidArgument` when `limit` is zero or `score_threshold` is
    /// outside `[0, 1]`.
    pub fn new(limit: usize, score_threshold: f64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidArgument("limit must be positive".into()));
        }
        if !(0.0..=1.0).contains(&score_threshold) {
            return Err(Error::InvalidArgument(format!(
                "score_threshold ({score_threshold}) must be between 0.0 and 1.0"
            )));
        }
        Ok(Self {
            limit,
            score_threshold,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }
}

impl Default for RetrieveConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            score_threshold: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_content_addressed() {
        let a = Document::new(Content::text("same text"), "doc1", 0, 1).unwrap();
        let b = Document::new(Content::text("same text"), "doc2", 0, 1).unwrap();
        assert_eq!(a.id(), b.id());

        let c = Document::new(Content::text("other text"), "doc1", 0, 1).unwrap();
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_document_rejects_bad_chunk_coordinates() {
        assert!(Document::new(Content::text("x"), "doc1", 0, 0).is_err());
        assert!(Document::new(Content::text("x"), "doc1", 3, 3).is_err());
        assert!(Document::new(Content::text("x"), "", 0, 1).is_err());
        assert!(Document::new(Content::text("x"), "doc1", 2, 3).is_ok());
    }

    #[test]
    fn test_with_score_leaves_original_untouched() {
        let doc = Document::new(Content::text("x"), "doc1", 0, 1).unwrap();
        let scored = doc.with_score(0.9);
        assert_eq!(scored.score(), Some(0.9));
        assert_eq!(doc.score(), None);
        assert_eq!(scored.id(), doc.id());
    }

    #[test]
    fn test_from_chunks_assigns_coordinates() {
        let docs = Document::from_chunks(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(docs.len(), 3);
        let doc_id = docs[0].doc_id().to_string();
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.doc_id(), doc_id);
            assert_eq!(doc.chunk_index(), i);
            assert_eq!(doc.chunk_count(), 3);
        }
    }

    #[test]
    fn test_image_content_hashes_url() {
        let a = Document::new(Content::image("https://example.com/a.png"), "d", 0, 1).unwrap();
        let b = Document::new(Content::image("https://example.com/b.png"), "d", 0, 1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_search_hit_rejects_empty_id() {
        assert!(SearchHit::new("", 0.5).is_err());
        assert!(SearchHit::new("x", 0.5).is_ok());
    }

    #[test]
    fn test_retrieve_config_validation() {
        assert!(RetrieveConfig::new(0, 0.5).is_err());
        assert!(RetrieveConfig::new(5, -0.1).is_err());
        assert!(RetrieveConfig::new(5, 1.1).is_err());
        assert!(RetrieveConfig::new(5, f64::NAN).is_err());
        let config = RetrieveConfig::new(5, 0.5).unwrap();
        assert_eq!(config.limit(), 5);
        assert_eq!(config.score_threshold(), 0.5);
    }

    #[test]
    fn test_retrieve_config_defaults() {
        let config = RetrieveConfig::default();
        assert_eq!(config.limit(), 5);
        assert_eq!(config.score_threshold(), 0.0);
    }
}
