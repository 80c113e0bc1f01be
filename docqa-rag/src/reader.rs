//! Document readers and the extension-based reader registry.
//!
//! A [`DocumentReader`] turns a source file into an ordered sequence of raw
//! text segments, one per page. Readers are looked up through a
//! [`ReaderRegistry`] keyed by file extension; an extension with no
//! registered reader is the "unsupported format" case, which the pipeline
//! reports as a sentinel rather than an error.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{RagError, Result};

/// One raw text segment of a source document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// 1-based page number within the source document.
    pub page: u32,
    /// The extracted text of the page.
    pub text: String,
}

/// A format-specific document reader.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// The lowercase file extensions this reader handles.
    fn extensions(&self) -> &[&str];

    /// Read the full document into ordered page segments.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Read`] on a corrupt file or unreadable path.
    async fn read(&self, path: &Path) -> Result<Vec<PageText>>;
}

/// The lowercase extension tag of a path, if it has one.
pub fn format_tag(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Registry of document readers, keyed by file extension.
///
/// Extensible by registration: adding a format means registering one more
/// reader, not editing a conditional chain.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Create a registry with the baseline reader set: PDF only.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfReader::new());
        registry
    }

    /// Register a reader for all the extensions it reports.
    pub fn register<R: DocumentReader + 'static>(&mut self, reader: R) {
        let reader = Arc::new(reader);
        for extension in reader.extensions() {
            self.readers
                .insert((*extension).to_ascii_lowercase(), reader.clone());
        }
    }

    /// Look up the reader registered for an extension tag.
    pub fn lookup(&self, extension: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&extension.to_ascii_lowercase()).cloned()
    }

    /// Find the reader for a file path, by its extension.
    pub fn reader_for(&self, path: &Path) -> Option<Arc<dyn DocumentReader>> {
        format_tag(path).and_then(|tag| self.lookup(&tag))
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Reader for PDF files, one segment per page.
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentReader for PdfReader {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn read(&self, path: &Path) -> Result<Vec<PageText>> {
        debug!(path = %path.display(), "reading PDF");

        // lopdf parsing is blocking work
        let path_owned = path.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || read_pdf_pages(&path_owned))
            .await
            .map_err(|e| RagError::Read(format!("PDF read task failed: {e}")))??;

        debug!(path = %path.display(), page_count = pages.len(), "read PDF");
        Ok(pages)
    }
}

/// Extract per-page text from a PDF on disk.
fn read_pdf_pages(path: &Path) -> Result<Vec<PageText>> {
    let document = lopdf::Document::load(path)
        .map_err(|e| RagError::Read(format!("failed to open PDF '{}': {e}", path.display())))?;

    let mut pages = Vec::new();
    for (number, _object_id) in document.get_pages() {
        let text = document.extract_text(&[number]).map_err(|e| {
            RagError::Read(format!(
                "failed to extract text from page {number} of '{}': {e}",
                path.display()
            ))
        })?;
        pages.push(PageText { page: number, text });
    }

    Ok(pages)
}

/// Reader for plain-text files, the whole file as one segment.
///
/// Not part of the baseline registry; register it explicitly when text
/// input is wanted (embedding hosts, tests).
pub struct PlainTextReader;

impl PlainTextReader {
    /// Create a new plain-text reader.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentReader for PlainTextReader {
    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    async fn read(&self, path: &Path) -> Result<Vec<PageText>> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::Read(format!("failed to read '{}': {e}", path.display())))?;
        Ok(vec![PageText { page: 1, text }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tag_lowercases_extension() {
        assert_eq!(format_tag(Path::new("report.PDF")), Some("pdf".to_string()));
        assert_eq!(format_tag(Path::new("notes.txt")), Some("txt".to_string()));
        assert_eq!(format_tag(Path::new("no_extension")), None);
    }

    #[test]
    fn default_registry_supports_only_pdf() {
        let registry = ReaderRegistry::with_defaults();
        assert!(registry.lookup("pdf").is_some());
        assert!(registry.lookup("docx").is_none());
        assert!(registry.lookup("txt").is_none());
    }

    #[test]
    fn registration_extends_the_registry() {
        let mut registry = ReaderRegistry::with_defaults();
        registry.register(PlainTextReader::new());
        assert!(registry.reader_for(Path::new("notes.txt")).is_some());
    }

    #[tokio::test]
    async fn plain_text_reader_returns_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello world").unwrap();

        let pages = PlainTextReader::new().read(&path).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].text, "hello world");
    }

    #[tokio::test]
    async fn corrupt_pdf_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfReader::new().read(&path).await.unwrap_err();
        assert!(matches!(err, RagError::Read(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = PdfReader::new()
            .read(Path::new("/nonexistent/missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Read(_)));
    }
}
