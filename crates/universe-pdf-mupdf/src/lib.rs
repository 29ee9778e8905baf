use std::path::Path;

use mupdf::{Document, TextPageFlags};

use universe_core::{BackendError, PdfBackend, PdfDocument};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the only one that links mupdf (AGPL-3.0). The parser and
/// writer crates do not depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;

        if document
            .needs_password()
            .map_err(|e| BackendError::Open(e.to_string()))?
        {
            return Err(BackendError::Open("document is password protected".into()));
        }

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))?;
        let page_count = usize::try_from(page_count)
            .map_err(|_| BackendError::Open(format!("invalid page count {page_count}")))?;

        tracing::debug!(path = %path.display(), pages = page_count, "opened PDF");

        Ok(Box::new(MupdfDocument {
            document,
            page_count,
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        let page_no = i32::try_from(index)
            .map_err(|_| BackendError::Extraction(format!("page index {index} out of range")))?;
        let page = self
            .document
            .load_page(page_no)
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        // One output line per text line, blocks in content-stream order
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }

        Ok(non_empty(page_text))
    }
}

/// Trim trailing line breaks and treat a page with no characters as textless.
fn non_empty(mut text: String) -> Option<String> {
    let trimmed_len = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed_len);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
