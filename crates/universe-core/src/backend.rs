use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
}

/// Trait for PDF text extraction backends.
///
/// A backend only knows how to open a file and hand out page text; joining
/// pages and skipping empty ones lives in [`crate::extract::extract_text`].
pub trait PdfBackend: Send + Sync {
    /// Open the document at `path`. The returned handle is released on drop.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An open PDF document.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Text of the page at `index` (0-based), or `None` when the page has no text layer.
    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError>;
}
