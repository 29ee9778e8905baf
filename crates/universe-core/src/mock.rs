//! In-memory PDF backend for testing.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend, PdfDocument};

/// A hand-rolled [`PdfBackend`] serving fixed page texts.
///
/// Supports:
/// - Pages with or without text (`None` models an image-only page).
/// - Failing on open, or on a specific page.
/// - Counting opens and currently open documents, to check handles are released.
#[derive(Debug, Default)]
pub struct MockBackend {
    pages: Vec<Option<String>>,
    open_error: Option<String>,
    failing_page: Option<usize>,
    opens: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a backend whose documents contain `pages`.
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(|p| p.map(Into::into)).collect(),
            ..Self::default()
        }
    }

    /// Create a backend whose documents have one text page per entry.
    pub fn with_text_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(pages.into_iter().map(Some))
    }

    /// Make every `open` fail with `message`.
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Make text extraction fail on the page at `index`.
    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    /// Number of times `open` was called.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of documents opened and not yet dropped.
    pub fn live_documents(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.open_error {
            return Err(BackendError::Open(message.clone()));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            failing_page: self.failing_page,
            live: Arc::clone(&self.live),
        }))
    }
}

struct MockDocument {
    pages: Vec<Option<String>>,
    failing_page: Option<usize>,
    live: Arc<AtomicUsize>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        if self.failing_page == Some(index) {
            return Err(BackendError::Extraction(format!(
                "cannot load page {}",
                index + 1
            )));
        }
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| BackendError::Extraction(format!("page {} out of range", index + 1)))
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
