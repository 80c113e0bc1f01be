//! # docqa-rag
//!
//! Document ingestion and retrieval for the docqa question-answering
//! pipeline: format-dispatched readers, boundary-aware chunking, embedding,
//! an exact nearest-neighbor index persisted at a deterministic location,
//! and the retrieval-to-generation hand-off.
//!
//! Two components compose the whole flow. The [`Indexer`] ingests one
//! document (read → chunk → embed → index → persist) and returns a
//! [`DocumentIndex`] handle; the [`Answerer`] takes a handle and a question
//! and produces an answer by retrieving the most relevant chunks and
//! stuffing them into a single language-model prompt.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod openai;
pub mod pipeline;
pub mod reader;

pub use chunking::{BoundaryChunker, Chunker};
pub use config::RagConfig;
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{DocumentIndex, INDEX_LOCATION_PREFIX, VectorIndex, index_location};
pub use openai::OpenAiEmbedder;
pub use pipeline::{Answerer, IndexOutcome, Indexer};
pub use reader::{DocumentReader, PageText, PdfReader, PlainTextReader, ReaderRegistry};
