use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use universe_core::{Diagnostic, RecordTable, Reporter, UniverseError};

/// What [`write_table`] did with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The table was empty; the destination was not touched.
    Skipped,
    Written { rows: usize },
}

/// Write `table` as CSV to `path`, creating or truncating the file.
///
/// An empty table performs no file-system access at all, so a run that found
/// nothing leaves no (empty) file behind.
pub fn write_table(
    table: &RecordTable,
    path: &Path,
    reporter: &dyn Reporter,
) -> Result<WriteOutcome, UniverseError> {
    if table.is_empty() {
        reporter.report(&Diagnostic::NothingToWrite);
        return Ok(WriteOutcome::Skipped);
    }

    let rows = table.len();
    reporter.report(&Diagnostic::WritingTable {
        path: path.to_path_buf(),
        rows,
    });

    match File::create(path).and_then(|file| write_table_to(table, file)) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), rows, "wrote CSV");
            reporter.report(&Diagnostic::TableWritten {
                path: path.to_path_buf(),
                rows,
            });
            Ok(WriteOutcome::Written { rows })
        }
        Err(source) => {
            reporter.report(&Diagnostic::WriteFailed {
                path: path.to_path_buf(),
                reason: source.to_string(),
            });
            Err(UniverseError::WriteFailure {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Serialize `table` as CSV into any writer: an `ISIN,Name` header, then one
/// `\n`-terminated row per record. Fields are quoted only when they contain a
/// comma, a quote or a line break.
///
/// Writes nothing at all for an empty table.
pub fn write_table_to<W: Write>(table: &RecordTable, writer: W) -> io::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for record in table {
        csv.serialize(record)?;
    }
    csv.flush()
}
