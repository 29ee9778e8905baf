use std::path::Path;

use crate::backend::PdfBackend;
use crate::report::{Diagnostic, Reporter};
use crate::UniverseError;

/// Extract the text of every page of the PDF at `path`, in page order.
///
/// Pages without text are skipped, the rest are joined with a single `\n`.
/// The document handle is dropped before this returns.
pub fn extract_text(
    path: &Path,
    backend: &dyn PdfBackend,
    reporter: &dyn Reporter,
) -> Result<String, UniverseError> {
    if !path.is_file() {
        return Err(UniverseError::NotFound {
            path: path.to_path_buf(),
        });
    }

    reporter.report(&Diagnostic::ReadingDocument {
        path: path.to_path_buf(),
    });

    let unreadable = |source| UniverseError::UnreadableDocument {
        path: path.to_path_buf(),
        source,
    };

    let document = backend.open(path).map_err(unreadable)?;
    let total = document.page_count();
    let mut pages_text = Vec::with_capacity(total);

    for index in 0..total {
        let text = document.page_text(index).map_err(unreadable)?;
        let text = text.filter(|t| !t.is_empty());
        reporter.report(&Diagnostic::PageExtracted {
            index,
            total,
            has_text: text.is_some(),
        });
        if let Some(text) = text {
            pages_text.push(text);
        } else {
            tracing::debug!(page = index + 1, "page has no text layer");
        }
    }
    drop(document);

    reporter.report(&Diagnostic::ExtractionComplete {
        pages: total,
        pages_with_text: pages_text.len(),
    });

    Ok(pages_text.join("\n"))
}
