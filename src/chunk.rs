//! Strategy-based text chunker.
//!
//! Splits raw text into bounded segments, each respecting a soft upper
//! bound of `chunk_size` units, with successive chunks overlapping by
//! `overlap` units of the preceding chunk's tail so context survives a
//! split boundary.
//!
//! Units are bytes of UTF-8 (snapped to character boundaries) for the
//! [`Paragraph`](SplitStrategy::Paragraph),
//! [`Sentence`](SplitStrategy::Sentence), and
//! [`Fixed`](SplitStrategy::Fixed) strategies, and whitespace-delimited
//! tokens for [`Token`](SplitStrategy::Token).
//!
//! # Algorithm
//!
//! 1. `Fixed` slides a `chunk_size` window, stepping by
//!    `chunk_size - overlap`.
//! 2. `Paragraph` / `Sentence` accumulate boundary-split units into a
//!    buffer until the next unit would exceed `chunk_size`, then flush,
//!    seeding the next buffer with the flushed chunk's tail.
//! 3. A single unit larger than `chunk_size` is hard-split with the
//!    fixed window.
//! 4. `Token` windows over whitespace tokens, stepping by
//!    `chunk_size - overlap` tokens.
//!
//! The output is a finite, ordered sequence of strings; the caller wraps
//! each one into a [`Document`](crate::models::Document) (see
//! [`Document::from_chunks`](crate::models::Document::from_chunks)).
//!
//! # Example
//!
//! ```rust
//! use ragkit::chunk::{chunk_text, SplitStrategy};
//!
//! let chunks =
//!     chunk_text("Hello world.\n\nSecond paragraph.", 512, SplitStrategy::Paragraph, 50)
//!         .unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};

/// How raw text is carved into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Accumulate `\n\n`-separated paragraphs up to the size bound.
    Paragraph,
    /// Accumulate sentences (split at `.`, `!`, `?`) up to the size bound.
    Sentence,
    /// Window over whitespace-delimited tokens.
    Token,
    /// Window over raw text regardless of boundaries.
    Fixed,
}

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_OVERLAP: usize = 50;

/// Split `text` into chunks per `strategy`.
///
/// Empty or whitespace-only input yields an empty sequence.
///
/// # Errors
///
/// `InvalidArgument` when `chunk_size` is zero or `overlap >= chunk_size`.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    strategy: SplitStrategy,
    overlap: usize,
) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(Error::InvalidArgument("chunk_size must be positive".into()));
    }
    if overlap >= chunk_size {
        return Err(Error::InvalidArgument(format!(
            "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let chunks = match strategy {
        SplitStrategy::Fixed => split_fixed(text, chunk_size, overlap),
        SplitStrategy::Token => split_tokens(text, chunk_size, overlap),
        SplitStrategy::Paragraph => {
            accumulate(text.split("\n\n"), "\n\n", chunk_size, overlap)
        }
        SplitStrategy::Sentence => {
            accumulate(sentences(text).into_iter(), " ", chunk_size, overlap)
        }
    };
    Ok(chunks)
}

/// Sliding window over raw bytes, snapped to character boundaries.
fn split_fixed(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let end = snap_to_char_boundary(text, (start + chunk_size).min(text.len()));
        if end > start {
            chunks.push(text[start..end].to_string());
        }
        if end == text.len() {
            break;
        }
        let mut next = snap_to_char_boundary(text, start + step);
        if next <= start {
            // boundary snapping can stall on multi-byte sequences
            next = next_char_boundary(text, start);
        }
        start = next;
    }
    chunks
}

/// Window over whitespace tokens; `chunk_size` and `overlap` count tokens.
fn split_tokens(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < tokens.len() {
        let end = (start + chunk_size).min(tokens.len());
        chunks.push(tokens[start..end].join(" "));
        if end == tokens.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Accumulate boundary-split units into chunks of at most `chunk_size`
/// bytes, carrying an `overlap`-byte tail across each flush.
fn accumulate<'a>(
    units: impl Iterator<Item = &'a str>,
    sep: &str,
    chunk_size: usize,
    overlap: usize,
) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut buf = String::new();
    // distinguishes real content from a bare overlap seed
    let mut buf_has_unit = false;

    for unit in units {
        let unit = unit.trim();
        if unit.is_empty() {
            continue;
        }

        if unit.len() > chunk_size {
            if buf_has_unit {
                chunks.push(std::mem::take(&mut buf));
            }
            chunks.extend(split_fixed(unit, chunk_size, overlap));
            buf = seed_from_last(&chunks, overlap);
            buf_has_unit = false;
            continue;
        }

        let projected = if buf.is_empty() {
            unit.len()
        } else {
            buf.len() + sep.len() + unit.len()
        };
        if projected > chunk_size {
            if buf_has_unit {
                chunks.push(std::mem::take(&mut buf));
                buf = seed_from_last(&chunks, overlap);
                buf_has_unit = false;
            }
            // drop the seed when it would push the next unit past the bound
            if !buf.is_empty() && buf.len() + sep.len() + unit.len() > chunk_size {
                buf.clear();
            }
        }

        if buf.is_empty() {
            buf.push_str(unit);
        } else {
            buf.push_str(sep);
            buf.push_str(unit);
        }
        buf_has_unit = true;
    }

    if buf_has_unit && !buf.is_empty() {
        chunks.push(buf);
    }
    chunks
}

fn seed_from_last(chunks: &[String], overlap: usize) -> String {
    match chunks.last() {
        Some(last) if overlap > 0 => tail_bytes(last, overlap).to_string(),
        _ => String::new(),
    }
}

/// Last `overlap` bytes of `s`, snapped forward to a character boundary.
fn tail_bytes(s: &str, overlap: usize) -> &str {
    if s.len() <= overlap {
        return s;
    }
    let mut start = s.len() - overlap;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

/// Split into sentences, keeping the terminator with its sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i.min(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        assert!(chunk_text("abc", 0, SplitStrategy::Fixed, 0).is_err());
        assert!(chunk_text("abc", 10, SplitStrategy::Fixed, 10).is_err());
        assert!(chunk_text("abc", 10, SplitStrategy::Fixed, 15).is_err());
        assert!(chunk_text("abc", 10, SplitStrategy::Fixed, 9).is_ok());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100, SplitStrategy::Paragraph, 10).unwrap().is_empty());
        assert!(chunk_text("  \n\n ", 100, SplitStrategy::Paragraph, 10).unwrap().is_empty());
    }

    #[test]
    fn test_fixed_windows_with_overlap() {
        let text = "a".repeat(1000);
        let chunks = chunk_text(&text, 300, SplitStrategy::Fixed, 50).unwrap();
        // windows [0, 300), [250, 550), [500, 800), [750, 1000)
        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            assert!(chunk.len() <= 300);
        }
        assert_eq!(chunks[0].len(), 300);
        assert_eq!(chunks[3].len(), 250);
        // each window starts exactly 50 units before the previous one's end
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * 250;
            assert_eq!(*chunk, text[start..start + chunk.len()]);
        }
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_text("Hello, world!", 512, SplitStrategy::Paragraph, 50).unwrap();
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_paragraphs_accumulate_under_limit() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = chunk_text(text, 512, SplitStrategy::Paragraph, 0).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("First paragraph."));
        assert!(chunks[0].contains("Third paragraph."));
    }

    #[test]
    fn test_paragraphs_split_when_exceeding_limit() {
        let text = "This is paragraph one.\n\nThis is paragraph two.\n\nThis is paragraph three.";
        let chunks = chunk_text(text, 30, SplitStrategy::Paragraph, 0).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 30, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_paragraph_overlap_carries_tail() {
        let text = format!("{}\n\n{}", "a".repeat(90), "b".repeat(80));
        let chunks = chunk_text(&text, 100, SplitStrategy::Paragraph, 10).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(90));
        assert!(chunks[1].starts_with(&"a".repeat(10)));
        assert!(chunks[1].ends_with(&"b".repeat(80)));
        assert!(chunks[1].len() <= 100);
    }

    #[test]
    fn test_overlap_seed_dropped_when_next_unit_would_overflow() {
        let text = format!("{}\n\n{}", "a".repeat(90), "b".repeat(95));
        let chunks = chunk_text(&text, 100, SplitStrategy::Paragraph, 10).unwrap();
        assert_eq!(chunks.len(), 2);
        // carrying the tail would exceed the bound, so the second chunk
        // starts clean
        assert_eq!(chunks[1], "b".repeat(95));
    }

    #[test]
    fn test_token_windows() {
        let text = (0..10).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&text, 4, SplitStrategy::Token, 1).unwrap();
        assert_eq!(chunks[0], "w0 w1 w2 w3");
        assert_eq!(chunks[1], "w3 w4 w5 w6");
        assert_eq!(chunks[2], "w6 w7 w8 w9");
    }

    #[test]
    fn test_sentence_accumulation() {
        let text = "One sentence here. Another one! A third? And a fourth.";
        let chunks = chunk_text(text, 40, SplitStrategy::Sentence, 0).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40, "chunk too long: {chunk:?}");
        }
        assert!(chunks[0].starts_with("One sentence here."));
    }

    #[test]
    fn test_multibyte_utf8_is_not_split_mid_char() {
        let text = "┌──────────────────┐ déjà vu 日本語のテキスト └──────┘".repeat(4);
        for strategy in [
            SplitStrategy::Fixed,
            SplitStrategy::Paragraph,
            SplitStrategy::Sentence,
            SplitStrategy::Token,
        ] {
            // would panic on a mid-char slice if boundaries were wrong
            let chunks = chunk_text(&text, 20, strategy, 5).unwrap();
            assert!(!chunks.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha\n\nBeta\n\nGamma\n\nDelta";
        let a = chunk_text(text, 12, SplitStrategy::Paragraph, 3).unwrap();
        let b = chunk_text(text, 12, SplitStrategy::Paragraph, 3).unwrap();
        assert_eq!(a, b);
    }
}
