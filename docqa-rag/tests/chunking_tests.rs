//! Property tests for boundary-aware chunking: coverage, size bound,
//! overlap, and determinism.

use std::collections::HashMap;

use docqa_rag::Document;
use docqa_rag::chunking::{BoundaryChunker, Chunker};
use proptest::prelude::*;

fn doc(text: &str) -> Document {
    Document {
        id: "doc".to_string(),
        text: text.to_string(),
        metadata: HashMap::new(),
        source_uri: None,
    }
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

/// Prose-like text: words mixed with spaces, sentence ends, line and
/// paragraph breaks.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,12}",
            2 => Just(" ".to_string()),
            1 => Just(". ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
        ],
        0..120,
    )
    .prop_map(|parts| parts.concat())
}

/// *For any* document and any valid (chunk_size, overlap) pair, each chunk
/// after the first starts with the trailing `overlap` characters of its
/// predecessor, and stripping those prefixes and concatenating reconstructs
/// the document text with no gaps.
mod prop_coverage_and_overlap {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_cover_the_text_and_share_overlaps(
            text in arb_text(),
            chunk_size in 24usize..64,
            overlap in 0usize..12,
        ) {
            let chunker = BoundaryChunker::new(chunk_size, overlap);
            let chunks = chunker.chunk(&doc(&text));

            if text.is_empty() {
                prop_assert!(chunks.is_empty());
                return Ok(());
            }
            prop_assert!(!chunks.is_empty());

            let mut rebuilt = chunks[0].text.clone();
            for window in chunks.windows(2) {
                let suffix = char_suffix(&window[0].text, overlap);
                prop_assert!(
                    window[1].text.starts_with(suffix),
                    "chunk does not start with its predecessor's overlap: {:?} vs {:?}",
                    suffix,
                    window[1].text,
                );
                rebuilt.push_str(&window[1].text[suffix.len()..]);
            }
            prop_assert_eq!(rebuilt, text);
        }
    }
}

/// *For any* document, every chunk stays within the configured character
/// bound; the character-level fallback guarantees this even for unbroken
/// runs longer than the bound.
mod prop_size_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn no_chunk_exceeds_chunk_size(
            text in arb_text(),
            chunk_size in 24usize..64,
            overlap in 0usize..12,
        ) {
            let chunker = BoundaryChunker::new(chunk_size, overlap);
            for chunk in chunker.chunk(&doc(&text)) {
                prop_assert!(
                    chunk.text.chars().count() <= chunk_size,
                    "chunk of {} chars exceeds bound {}",
                    chunk.text.chars().count(),
                    chunk_size,
                );
            }
        }
    }
}

/// *For any* document, chunking twice with the same parameters yields the
/// same number of chunks with identical text, ids, and ordering.
mod prop_determinism {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunking_is_reproducible(
            text in arb_text(),
            chunk_size in 24usize..64,
            overlap in 0usize..12,
        ) {
            let chunker = BoundaryChunker::new(chunk_size, overlap);
            let first = chunker.chunk(&doc(&text));
            let second = chunker.chunk(&doc(&text));
            prop_assert_eq!(first, second);
        }
    }
}

/// *For any* document, chunk ids and `chunk_index` metadata follow document
/// order.
mod prop_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunk_ids_follow_document_order(
            text in arb_text(),
            chunk_size in 24usize..64,
        ) {
            let chunker = BoundaryChunker::new(chunk_size, 8);
            for (i, chunk) in chunker.chunk(&doc(&text)).iter().enumerate() {
                prop_assert_eq!(&chunk.id, &format!("doc_{i}"));
                prop_assert_eq!(&chunk.metadata["chunk_index"], &i.to_string());
                prop_assert_eq!(&chunk.document_id, &"doc".to_string());
            }
        }
    }
}
