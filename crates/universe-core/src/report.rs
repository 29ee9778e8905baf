//! Diagnostic channel for user-facing progress and status messages.
//!
//! Core functions never print. They hand a [`Diagnostic`] to whatever
//! [`Reporter`] the caller injected: a console printer in the CLI, a
//! collecting closure in tests, or [`NullReporter`].

use std::fmt;
use std::path::PathBuf;

/// Progress and status events emitted during a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    ReadingDocument {
        path: PathBuf,
    },
    PageExtracted {
        index: usize,
        total: usize,
        has_text: bool,
    },
    ExtractionComplete {
        pages: usize,
        pages_with_text: usize,
    },
    RecordsFound {
        count: usize,
    },
    NoRecordsFound,
    NothingToWrite,
    WritingTable {
        path: PathBuf,
        rows: usize,
    },
    TableWritten {
        path: PathBuf,
        rows: usize,
    },
    WriteFailed {
        path: PathBuf,
        reason: String,
    },
}

impl Diagnostic {
    /// Whether the event signals a problem rather than normal progress.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Diagnostic::NoRecordsFound | Diagnostic::NothingToWrite | Diagnostic::WriteFailed { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ReadingDocument { path } => {
                write!(f, "Reading PDF: '{}'...", path.display())
            }
            Diagnostic::PageExtracted {
                index,
                total,
                has_text,
            } => {
                if *has_text {
                    write!(f, "[{}/{}] extracted page text", index + 1, total)
                } else {
                    write!(f, "[{}/{}] page has no text, skipped", index + 1, total)
                }
            }
            Diagnostic::ExtractionComplete {
                pages,
                pages_with_text,
            } => write!(
                f,
                "Successfully extracted text from {} pages ({} with text).",
                pages, pages_with_text
            ),
            Diagnostic::RecordsFound { count } => {
                write!(f, "Found {} potential stock records.", count)
            }
            Diagnostic::NoRecordsFound => {
                write!(f, "No data matching the ISIN pattern was found in the text.")
            }
            Diagnostic::NothingToWrite => {
                write!(f, "No data to write. CSV file will not be created.")
            }
            Diagnostic::WritingTable { path, rows } => {
                write!(f, "Writing {} rows to '{}'...", rows, path.display())
            }
            Diagnostic::TableWritten { path, rows } => write!(
                f,
                "Successfully created the CSV file '{}' ({} rows).",
                path.display(),
                rows
            ),
            Diagnostic::WriteFailed { path, reason } => write!(
                f,
                "Could not write to file '{}'. Reason: {}",
                path.display(),
                reason
            ),
        }
    }
}

/// Receiver for [`Diagnostic`] events.
pub trait Reporter {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> Reporter for F
where
    F: Fn(&Diagnostic),
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to `tracing` (`warn` for problems, `info` otherwise,
/// per-page events at `debug`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::PageExtracted { .. } => tracing::debug!("{}", diagnostic),
            d if d.is_warning() => tracing::warn!("{}", d),
            d => tracing::info!("{}", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closure_reporter_receives_events() {
        let seen = Mutex::new(Vec::new());
        let reporter = |d: &Diagnostic| seen.lock().unwrap().push(d.clone());

        reporter.report(&Diagnostic::RecordsFound { count: 2 });
        reporter.report(&Diagnostic::NothingToWrite);

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![Diagnostic::RecordsFound { count: 2 }, Diagnostic::NothingToWrite]
        );
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Diagnostic::RecordsFound { count: 3 }.to_string(),
            "Found 3 potential stock records."
        );
        assert_eq!(
            Diagnostic::PageExtracted {
                index: 0,
                total: 4,
                has_text: false
            }
            .to_string(),
            "[1/4] page has no text, skipped"
        );
        assert_eq!(
            Diagnostic::WriteFailed {
                path: PathBuf::from("out.csv"),
                reason: "permission denied".into()
            }
            .to_string(),
            "Could not write to file 'out.csv'. Reason: permission denied"
        );
    }

    #[test]
    fn warnings() {
        assert!(Diagnostic::NoRecordsFound.is_warning());
        assert!(Diagnostic::NothingToWrite.is_warning());
        assert!(!Diagnostic::RecordsFound { count: 1 }.is_warning());
    }
}
