//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`BoundaryChunker`], a
//! splitter that prefers semantically meaningful boundaries (paragraphs,
//! lines, sentences, words) and only falls back to harder cuts when a
//! segment cannot fit the size bound.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Boundary types tried in priority order: paragraph break, line break,
/// sentence-ending punctuation followed by a space, then word boundary.
/// Character-level splitting is the implicit final fallback.
const BOUNDARY_LEVELS: &[&[&str]] = &[&["\n\n"], &["\n"], &[". ", "! ", "? "], &[" "]];

/// Splits text at preferred boundaries into chunks of at most `chunk_size`
/// characters, consecutive chunks sharing `chunk_overlap` characters.
///
/// All sizes count Unicode scalar values, not bytes. Each chunk after the
/// first starts with the trailing `chunk_overlap` characters of its
/// predecessor; the non-overlapping remainders are contiguous, so chunks
/// cover the input with no gaps.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(2000, 100);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of characters shared with the previous chunk
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        // Fresh content per chunk is budgeted so that the overlap prefix
        // never pushes a chunk past chunk_size.
        let budget = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let pieces = split_within_bound(&document.text, BOUNDARY_LEVELS, budget);

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut previous_window = String::new();
        for (i, piece) in pieces.into_iter().enumerate() {
            let window = if i == 0 {
                piece
            } else {
                let mut w =
                    String::from(char_suffix(&previous_window, self.chunk_overlap));
                w.push_str(&piece);
                w
            };

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), i.to_string());

            chunks.push(Chunk {
                id: format!("{}_{i}", document.id),
                text: window.clone(),
                embedding: Vec::new(),
                metadata,
                document_id: document.id.clone(),
            });
            previous_window = window;
        }

        chunks
    }
}

/// Split `text` into pieces of at most `max_chars` characters whose
/// concatenation equals `text`, cutting at the highest-priority boundary
/// level that works and recursing into the next level for segments that
/// alone exceed the bound.
fn split_within_bound(text: &str, levels: &[&[&str]], max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }
    let Some((separators, rest)) = levels.split_first() else {
        return split_by_chars(text, max_chars);
    };

    let segments = split_keeping_any(text, separators);
    if segments.len() <= 1 {
        // Boundary absent at this level; try the next-more-permissive one.
        return split_within_bound(text, rest, max_chars);
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for segment in segments {
        let segment_len = char_len(segment);
        if segment_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            pieces.extend(split_within_bound(segment, rest, max_chars));
        } else if current_len + segment_len <= max_chars {
            current.push_str(segment);
            current_len += segment_len;
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(segment);
            current_len = segment_len;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Split text at any of the given separators, keeping each separator
/// attached to the preceding segment.
fn split_keeping_any<'a>(text: &'a str, separators: &[&str]) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // Earliest match of any separator from `start`.
        let mut earliest: Option<(usize, usize)> = None;
        for separator in separators {
            if let Some(pos) = text[start..].find(separator) {
                let pos = start + pos;
                if earliest.is_none_or(|(best, _)| pos < best) {
                    earliest = Some((pos, separator.len()));
                }
            }
        }

        match earliest {
            Some((pos, len)) => {
                let end = pos + len;
                result.push(&text[start..end]);
                start = end;
            }
            None => {
                result.push(&text[start..]);
                break;
            }
        }
    }

    result
}

/// Hard character-level split into pieces of at most `max_chars` characters.
fn split_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// The trailing `n_chars` characters of `s` (all of `s` if shorter).
fn char_suffix(s: &str, n_chars: usize) -> &str {
    if n_chars == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n_chars - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Character count of `s` (Unicode scalar values).
fn char_len(s: &str) -> usize {
    s.chars().count()
}
