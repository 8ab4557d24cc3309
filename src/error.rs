//! Failure taxonomy for the retrieval pipeline.
//!
//! Four caller-visible failure classes cover the whole crate:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`Error::InvalidArgument`] | Empty, out-of-range, or otherwise unusable input |
//! | [`Error::DimensionMismatch`] | Vector length ≠ configured dimensionality |
//! | [`Error::InvalidState`] | Operation requires setup that has not happened |
//! | [`Error::Backend`] | Opaque failure from a provider or index backend |
//!
//! `InvalidArgument` and `DimensionMismatch` are surfaced synchronously to
//! the immediate caller and are never retried or swallowed. Per-item
//! failures inside a batch add are caught and reported through
//! [`BatchReport`](crate::knowledge::BatchReport) instead of failing the
//! batch.

use thiserror::Error;

/// Errors produced by the retrieval pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Empty, out-of-range, or otherwise unusable input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Vector length does not match the configured dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Operation requires prior setup that has not been satisfied.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Opaque failure from an embedding provider or index backend. The
    /// underlying cause is preserved but never interpreted by the core.
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
