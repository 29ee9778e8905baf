use std::io::Write;
use std::path::{Path, PathBuf};

use universe_core::{
    Config, Diagnostic, PdfBackend, RecordTable, Reporter, UniverseError, WriteFailurePolicy,
    extract_text, parse_records,
};
use universe_reporting::{WriteOutcome, write_table, write_table_to};

/// Where the parsed table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
    /// Parse only; the caller prints the records.
    DryRun,
}

impl Destination {
    pub fn resolve(output: &Path, dry_run: bool) -> Self {
        if dry_run {
            Destination::DryRun
        } else if output == Path::new("-") {
            Destination::Stdout
        } else {
            Destination::File(output.to_path_buf())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written { rows: usize },
    NothingToWrite,
    DryRun,
    /// The write failed but the policy says to carry on.
    WriteFailed { reason: String },
}

#[derive(Debug)]
pub struct Conversion {
    pub table: RecordTable,
    pub outcome: Outcome,
}

/// Run extraction, parsing and export for one input file.
///
/// `stdout` receives the CSV when the destination is [`Destination::Stdout`].
pub fn convert(
    input: &Path,
    destination: &Destination,
    config: &Config,
    backend: &dyn PdfBackend,
    reporter: &dyn Reporter,
    stdout: &mut dyn Write,
) -> Result<Conversion, UniverseError> {
    let text = extract_text(input, backend, reporter)?;
    let table = parse_records(&text, &config.parse);

    if table.is_empty() {
        reporter.report(&Diagnostic::NoRecordsFound);
    } else {
        reporter.report(&Diagnostic::RecordsFound { count: table.len() });
    }

    let written = match destination {
        Destination::DryRun => {
            return Ok(Conversion {
                table,
                outcome: Outcome::DryRun,
            });
        }
        Destination::File(path) => write_table(&table, path, reporter),
        Destination::Stdout => write_stdout(&table, reporter, stdout),
    };

    let outcome = match written {
        Ok(WriteOutcome::Written { rows }) => Outcome::Written { rows },
        Ok(WriteOutcome::Skipped) => Outcome::NothingToWrite,
        Err(err @ UniverseError::WriteFailure { .. })
            if config.on_write_failure == WriteFailurePolicy::Warn =>
        {
            tracing::debug!(error = %err, "write failed, continuing as configured");
            Outcome::WriteFailed {
                reason: err.to_string(),
            }
        }
        Err(err) => return Err(err),
    };

    Ok(Conversion { table, outcome })
}

fn write_stdout(
    table: &RecordTable,
    reporter: &dyn Reporter,
    stdout: &mut dyn Write,
) -> Result<WriteOutcome, UniverseError> {
    if table.is_empty() {
        reporter.report(&Diagnostic::NothingToWrite);
        return Ok(WriteOutcome::Skipped);
    }
    let path = PathBuf::from("<stdout>");
    match write_table_to(table, stdout) {
        Ok(()) => Ok(WriteOutcome::Written { rows: table.len() }),
        Err(source) => {
            reporter.report(&Diagnostic::WriteFailed {
                path: path.clone(),
                reason: source.to_string(),
            });
            Err(UniverseError::WriteFailure { path, source })
        }
    }
}
