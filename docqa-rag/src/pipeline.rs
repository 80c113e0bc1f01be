//! The two pipeline components: the [`Indexer`], which turns a document
//! file into a persisted [`DocumentIndex`], and the [`Answerer`], which
//! answers questions against a built index.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{Answerer, Indexer, IndexOutcome, RagConfig};
//!
//! let indexer = Indexer::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(embedder.clone())
//!     .build()?;
//!
//! let index = match indexer.build_index(Path::new("report.pdf")).await? {
//!     IndexOutcome::Built(index) => index,
//!     IndexOutcome::Unsupported { extension } => {
//!         eprintln!("unsupported format: {extension}");
//!         return Ok(());
//!     }
//! };
//!
//! let answerer = Answerer::builder()
//!     .embedding_provider(embedder)
//!     .chat_model(model)
//!     .build()?;
//! let answer = answerer.answer(&index, "What was Q2 revenue?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use docqa_core::ChatModel;
use tracing::{error, info};

use crate::chunking::{BoundaryChunker, Chunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::{DocumentIndex, VectorIndex, index_location};
use crate::reader::{ReaderRegistry, format_tag};

/// The result of an ingestion attempt.
///
/// An unrecognized file extension is a recognized, non-fatal outcome —
/// callers present a message instead of handling an error.
#[derive(Debug)]
pub enum IndexOutcome {
    /// The document was ingested; the handle references the in-memory
    /// index and its persisted copy.
    Built(DocumentIndex),
    /// No reader is registered for the file's extension.
    Unsupported {
        /// The lowercase extension tag, empty when the path has none.
        extension: String,
    },
}

/// Builds a persisted vector index from a document file.
///
/// Composes a [`ReaderRegistry`], a [`Chunker`], and an
/// [`EmbeddingProvider`]; construct one via [`Indexer::builder()`].
pub struct Indexer {
    config: RagConfig,
    readers: ReaderRegistry,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Indexer {
    /// Create a new [`IndexerBuilder`].
    pub fn builder() -> IndexerBuilder {
        IndexerBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest one document: read → chunk → embed → index → persist.
    ///
    /// Returns [`IndexOutcome::Unsupported`] for unrecognized extensions.
    /// Re-running for the same document overwrites the persisted index at
    /// its deterministic location.
    ///
    /// # Errors
    ///
    /// Read, embedding, and persistence failures are fatal to this
    /// ingestion and surface unchanged; nothing is persisted on failure.
    pub async fn build_index(&self, path: &Path) -> Result<IndexOutcome> {
        let Some(reader) = self.readers.reader_for(path) else {
            let extension = format_tag(path).unwrap_or_default();
            info!(path = %path.display(), extension = %extension, "unsupported document format");
            return Ok(IndexOutcome::Unsupported { extension });
        };

        let document_id = document_id_for(path);

        // 1. Read the document into ordered page segments
        let pages = reader.read(path).await?;

        // 2. Chunk page by page, so chunks never span pages and keep
        //    their page attribution
        let mut chunks: Vec<Chunk> = Vec::new();
        for page in &pages {
            if page.text.is_empty() {
                continue;
            }
            let page_document = Document {
                id: format!("{document_id}_p{}", page.page),
                text: page.text.clone(),
                metadata: [("page".to_string(), page.page.to_string())].into(),
                source_uri: Some(path.display().to_string()),
            };
            chunks.extend(self.chunker.chunk(&page_document));
        }

        // 3. Embed all chunk texts in one batch
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document_id, error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!("embedding failed for document '{document_id}': {e}"))
        })?;
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 4. Index and persist
        let mut index = VectorIndex::new(self.embedder.dimensions());
        let chunk_count = chunks.len();
        index.insert(chunks)?;

        let handle = DocumentIndex::new(document_id.clone(), index_location(path), index);
        handle.save().await?;

        info!(
            document.id = %document_id,
            page_count = pages.len(),
            chunk_count,
            location = %handle.location().display(),
            "built document index"
        );
        Ok(IndexOutcome::Built(handle))
    }
}

/// The document identifier for a source path: its file stem.
fn document_id_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Builder for constructing an [`Indexer`].
///
/// Only the embedding provider is required; configuration defaults to
/// [`RagConfig::default()`], readers to the baseline registry, and the
/// chunker to a [`BoundaryChunker`] sized from the configuration.
#[derive(Default)]
pub struct IndexerBuilder {
    config: Option<RagConfig>,
    readers: Option<ReaderRegistry>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl IndexerBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the reader registry.
    pub fn readers(mut self, readers: ReaderRegistry) -> Self {
        self.readers = Some(readers);
        self
    }

    /// Override the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Build the [`Indexer`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the embedding provider is missing.
    pub fn build(self) -> Result<Indexer> {
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(BoundaryChunker::new(config.chunk_size, config.chunk_overlap))
        });
        let readers = self.readers.unwrap_or_default();

        Ok(Indexer {
            config,
            readers,
            chunker,
            embedder,
        })
    }
}

/// Answers questions against a built [`DocumentIndex`].
///
/// The embedding provider must be the one the index was built with; the
/// language model is invoked with deterministic decoding. Answering never
/// mutates the index, so a failed query leaves it fully reusable.
pub struct Answerer {
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
}

impl Answerer {
    /// Create a new [`AnswererBuilder`].
    pub fn builder() -> AnswererBuilder {
        AnswererBuilder::default()
    }

    /// Answer a question: embed → retrieve top-K → stuff → generate.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidQuery`] for an empty or whitespace-only
    /// question. Embedding and generation failures are fatal to this call
    /// and surface with the underlying message; no retries.
    pub async fn answer(&self, index: &DocumentIndex, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidQuery(
                "question must not be empty".to_string(),
            ));
        }

        // 1. Embed the question in the same space as the index
        let query_embedding = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        // 2. Retrieve the most relevant chunks
        let results = index.search(&query_embedding, self.top_k);

        // 3. Stuff context and question into a single prompt
        let prompt = stuff_prompt(&results, question);

        // 4. Generate with deterministic decoding
        let answer = self.model.generate(&prompt).await.map_err(|e| {
            error!(model = self.model.name(), error = %e, "generation failed");
            RagError::Pipeline(format!("generation failed: {e}"))
        })?;

        info!(
            document.id = %index.document_id(),
            result_count = results.len(),
            model = self.model.name(),
            "answered question"
        );
        Ok(answer)
    }
}

/// Concatenate the retrieved chunks and the question into one prompt.
fn stuff_prompt(results: &[SearchResult], question: &str) -> String {
    let context: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try \
         to make up an answer.\n\n{}\n\nQuestion: {}\nHelpful Answer:",
        context.join("\n\n"),
        question
    )
}

/// Builder for constructing an [`Answerer`].
#[derive(Default)]
pub struct AnswererBuilder {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn ChatModel>>,
    top_k: Option<usize>,
}

impl AnswererBuilder {
    /// Set the embedding provider. Must match the one used at indexing.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the chat language model.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set how many chunks to retrieve per question.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Build the [`Answerer`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the embedding provider or chat
    /// model is missing, or if `top_k` is zero.
    pub fn build(self) -> Result<Answerer> {
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let model = self
            .model
            .ok_or_else(|| RagError::Config("chat_model is required".to_string()))?;
        let top_k = self.top_k.unwrap_or_else(|| RagConfig::default().top_k);
        if top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }

        Ok(Answerer {
            embedder,
            model,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: "doc_0".into(),
                text: text.into(),
                embedding: Vec::new(),
                metadata: Default::default(),
                document_id: "doc".into(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn stuff_prompt_contains_context_and_question() {
        let results = vec![result("Revenue was $12M in Q2."), result("Costs fell.")];
        let prompt = stuff_prompt(&results, "What was Q2 revenue?");
        assert!(prompt.contains("Revenue was $12M in Q2."));
        assert!(prompt.contains("Costs fell."));
        assert!(prompt.contains("Question: What was Q2 revenue?"));
        // Context precedes the question
        let ctx = prompt.find("Revenue was").unwrap();
        let q = prompt.find("Question:").unwrap();
        assert!(ctx < q);
    }

    #[test]
    fn document_id_uses_the_file_stem() {
        assert_eq!(document_id_for(Path::new("reports/q2.pdf")), "q2");
        assert_eq!(document_id_for(Path::new("annual report.pdf")), "annual report");
    }
}
