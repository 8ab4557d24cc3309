//! Rendering helpers for retrieved documents.
//!
//! Consumers that inject retrieval results into an LLM prompt need the
//! ranked list as text; these helpers cover the common shapes without
//! each caller re-deriving them.

use crate::error::{Error, Result};
use crate::models::Document;

/// Render a ranked list for display or prompt injection.
pub fn format_documents(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No documents found.".to_string();
    }

    let mut out = format!("Retrieved {} document(s):\n\n", documents.len());
    for (i, doc) in documents.iter().enumerate() {
        out.push_str(&format!("Document {}", i + 1));
        if let Some(score) = doc.score() {
            out.push_str(&format!(" (Score: {score:.3})"));
        }
        out.push_str(":\n");
        out.push_str(&doc.content().embeddable_text());
        out.push_str("\n\n");
    }
    out
}

/// Extracted text of each document, in order.
pub fn extract_texts(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|doc| doc.content().embeddable_text().into_owned())
        .collect()
}

/// Join the documents' texts with `separator` into one context string.
pub fn combine_texts(documents: &[Document], separator: &str) -> String {
    documents
        .iter()
        .map(|doc| doc.content().embeddable_text())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Keep only documents whose score is present and at least `threshold`.
pub fn filter_by_score(documents: Vec<Document>, threshold: f64) -> Vec<Document> {
    documents
        .into_iter()
        .filter(|doc| doc.score().is_some_and(|score| score >= threshold))
        .collect()
}

/// Truncate a (merged) result list to a strict global top-K.
///
/// # Errors
///
/// `InvalidArgument` when `limit` is zero.
pub fn limit_documents(mut documents: Vec<Document>, limit: usize) -> Result<Vec<Document>> {
    if limit == 0 {
        return Err(Error::InvalidArgument("limit must be positive".into()));
    }
    documents.truncate(limit);
    Ok(documents)
}
