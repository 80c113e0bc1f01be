//! The vector index and its on-disk persistence.
//!
//! A [`VectorIndex`] is an exact nearest-neighbor structure owning one
//! document's chunks and their embeddings. [`DocumentIndex`] wraps it with
//! its persisted location, which is derived deterministically from the
//! source document's file name. The on-disk byte format is owned by this
//! crate and carries no compatibility promise; only the location-naming
//! rule is a contract.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};

/// Prefix of every persisted index directory name.
pub const INDEX_LOCATION_PREFIX: &str = "vector_store_";

/// File inside the index directory holding the serialized index.
const INDEX_FILE: &str = "index.json";

/// The deterministic storage location for a document's index:
/// a `vector_store_<file stem>` directory next to the source document.
///
/// Re-running ingestion for the same document overwrites this location;
/// last writer wins.
pub fn index_location(document_path: &Path) -> PathBuf {
    let stem = document_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let dir_name = format!("{INDEX_LOCATION_PREFIX}{stem}");
    match document_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir_name),
        _ => PathBuf::from(dir_name),
    }
}

/// An in-memory exact nearest-neighbor index over chunk embeddings.
///
/// Owns its chunks exclusively; search scores by cosine similarity.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    dimensions: usize,
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Create an empty index for embeddings of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            chunks: Vec::new(),
        }
    }

    /// Insert chunks into the index. Chunks must carry embeddings of the
    /// index's dimensionality.
    pub fn insert(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        for chunk in &chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(RagError::Index(format!(
                    "chunk '{}' has embedding of dimension {}, index expects {}",
                    chunk.id,
                    chunk.embedding.len(),
                    self.dimensions
                )));
            }
        }
        self.chunks.extend(chunks);
        Ok(())
    }

    /// The `top_k` chunks most similar to `embedding`, ordered by
    /// descending cosine similarity.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Dimensionality of the indexed embeddings.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The indexed chunks, in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[derive(Serialize)]
struct StoredIndexRef<'a> {
    document_id: &'a str,
    index: &'a VectorIndex,
}

#[derive(Deserialize)]
struct StoredIndex {
    document_id: String,
    index: VectorIndex,
}

/// The handle to one ingested document: its in-memory [`VectorIndex`] and
/// the location of its persisted copy.
///
/// Querying the handle never mutates it, so a failed query leaves the
/// index fully reusable.
#[derive(Debug)]
pub struct DocumentIndex {
    document_id: String,
    location: PathBuf,
    index: VectorIndex,
}

impl DocumentIndex {
    /// Wrap a built [`VectorIndex`] with its document id and persisted
    /// location.
    pub fn new(document_id: impl Into<String>, location: impl Into<PathBuf>, index: VectorIndex) -> Self {
        Self {
            document_id: document_id.into(),
            location: location.into(),
            index,
        }
    }

    /// The identifier of the ingested document.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Where the persisted copy of this index lives.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Number of indexed chunks.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// The underlying vector index.
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// The `top_k` most similar chunks to a query embedding.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        self.index.search(embedding, top_k)
    }

    /// Persist the index to its location, overwriting any prior copy.
    pub async fn save(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.location)
            .await
            .map_err(|e| {
                RagError::Index(format!(
                    "failed to create '{}': {e}",
                    self.location.display()
                ))
            })?;

        let payload = serde_json::to_vec(&StoredIndexRef {
            document_id: &self.document_id,
            index: &self.index,
        })
        .map_err(|e| RagError::Index(format!("failed to serialize index: {e}")))?;

        let file = self.location.join(INDEX_FILE);
        tokio::fs::write(&file, payload)
            .await
            .map_err(|e| RagError::Index(format!("failed to write '{}': {e}", file.display())))?;

        info!(
            document.id = %self.document_id,
            location = %self.location.display(),
            chunk_count = self.index.len(),
            "persisted index"
        );
        Ok(())
    }

    /// Reload a previously persisted index from its location.
    pub async fn load(location: impl Into<PathBuf>) -> Result<Self> {
        let location = location.into();
        let file = location.join(INDEX_FILE);
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|e| RagError::Index(format!("failed to read '{}': {e}", file.display())))?;

        let stored: StoredIndex = serde_json::from_slice(&bytes)
            .map_err(|e| RagError::Index(format!("failed to parse '{}': {e}", file.display())))?;

        info!(
            document.id = %stored.document_id,
            location = %location.display(),
            chunk_count = stored.index.len(),
            "loaded index"
        );
        Ok(Self {
            document_id: stored.document_id,
            location,
            index: stored.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_of_identical_vectors_is_one() {
        let v = vec![0.5, 0.5, 0.7];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_similarity_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn insert_rejects_mismatched_dimensions() {
        let mut index = VectorIndex::new(3);
        let chunk = Chunk {
            id: "c_0".into(),
            text: "text".into(),
            embedding: vec![1.0, 0.0],
            metadata: Default::default(),
            document_id: "c".into(),
        };
        let err = index.insert(vec![chunk]).unwrap_err();
        assert!(matches!(err, RagError::Index(_)));
        assert!(index.is_empty());
    }
}
