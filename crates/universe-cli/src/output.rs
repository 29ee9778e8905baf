use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use universe_core::{Diagnostic, RecordTable, Reporter, UniverseError};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Prints diagnostics to stderr and shows a page progress bar while the PDF
/// is being read.
pub struct ConsoleReporter {
    color: ColorMode,
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new(color: ColorMode) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.set_message("Extracting pages");
        Self { color, bar }
    }

    fn print(&self, diagnostic: &Diagnostic) {
        let line = format_diagnostic(diagnostic, self.color);
        self.bar.suspend(|| eprintln!("{}", line));
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ReadingDocument { .. } => {
                self.print(diagnostic);
                self.bar.enable_steady_tick(Duration::from_millis(120));
            }
            Diagnostic::PageExtracted { index, total, .. } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(*index as u64 + 1);
            }
            Diagnostic::ExtractionComplete { .. } => {
                self.bar.finish_and_clear();
                self.print(diagnostic);
            }
            _ => self.print(diagnostic),
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Render a diagnostic as a single console line.
pub fn format_diagnostic(diagnostic: &Diagnostic, color: ColorMode) -> String {
    match diagnostic {
        Diagnostic::WriteFailed { .. } => {
            if color.enabled() {
                format!("{} {}", "Error:".red().bold(), diagnostic)
            } else {
                format!("Error: {}", diagnostic)
            }
        }
        d if d.is_warning() => {
            if color.enabled() {
                format!("{} {}", "Warning:".yellow(), d)
            } else {
                format!("Warning: {}", d)
            }
        }
        Diagnostic::TableWritten { .. } if color.enabled() => diagnostic.green().to_string(),
        _ => diagnostic.to_string(),
    }
}

/// Render the message printed when the run fails, or `None` when a diagnostic
/// has already said it.
pub fn format_error(err: &UniverseError) -> Option<String> {
    match err {
        UniverseError::NotFound { path } => Some(format!(
            "Error: The input file '{}' was not found.",
            path.display()
        )),
        // The writer reports this as `Diagnostic::WriteFailed`.
        UniverseError::WriteFailure { .. } => None,
        UniverseError::UnreadableDocument { .. } | UniverseError::Unknown(_) => {
            Some(format!("An unexpected error occurred: {}", err))
        }
    }
}

/// Print the parsed records for `--dry-run`.
pub fn print_records(
    w: &mut dyn Write,
    file_name: &str,
    table: &RecordTable,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} records, {} lines scanned)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            table.len(),
            table.stats.lines_scanned
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({} records, {} lines scanned)\n",
            file_name,
            table.len(),
            table.stats.lines_scanned
        )?;
    }

    for (i, record) in table.iter().enumerate() {
        let name = if record.name.is_empty() {
            "(no name)"
        } else {
            record.name.as_str()
        };
        if color.enabled() {
            writeln!(
                w,
                "{:>4}  {}  {}",
                format!("[{}]", i + 1).dimmed(),
                record.isin.yellow(),
                name
            )?;
        } else {
            writeln!(w, "{:>4}  {}  {}", format!("[{}]", i + 1), record.isin, name)?;
        }
    }

    let stats = &table.stats;
    writeln!(w)?;
    writeln!(
        w,
        "Total: {} records ({} matched lines, {} with empty names, {} skipped)",
        table.len(),
        stats.matched,
        stats.empty_names,
        stats.skipped_empty
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use universe_core::{ParseOptions, parse_records};

    const NO_COLOR: ColorMode = ColorMode(false);

    #[test]
    fn test_format_plain_diagnostics() {
        assert_eq!(
            format_diagnostic(&Diagnostic::RecordsFound { count: 2 }, NO_COLOR),
            "Found 2 potential stock records."
        );
        assert_eq!(
            format_diagnostic(&Diagnostic::NothingToWrite, NO_COLOR),
            "Warning: No data to write. CSV file will not be created."
        );
        assert_eq!(
            format_diagnostic(
                &Diagnostic::WriteFailed {
                    path: PathBuf::from("out.csv"),
                    reason: "denied".into()
                },
                NO_COLOR
            ),
            "Error: Could not write to file 'out.csv'. Reason: denied"
        );
    }

    #[test]
    fn test_format_not_found_error() {
        let err = UniverseError::NotFound {
            path: PathBuf::from("report.pdf"),
        };
        assert_eq!(
            format_error(&err).as_deref(),
            Some("Error: The input file 'report.pdf' was not found.")
        );
    }

    #[test]
    fn test_format_other_error() {
        let err = UniverseError::Unknown("boom".into());
        assert_eq!(
            format_error(&err).as_deref(),
            Some("An unexpected error occurred: boom")
        );
    }

    #[test]
    fn test_write_failure_is_not_repeated() {
        let err = UniverseError::WriteFailure {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(format_error(&err), None);
    }

    #[test]
    fn test_print_records() {
        let table = parse_records(
            "US0378331005  Apple Inc\nNot a match\nDE000BASF111 BASF SE\nUS5949181045 ",
            &ParseOptions::default(),
        );
        let mut buf = Vec::new();
        print_records(&mut buf, "report.pdf", &table, NO_COLOR).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("DRY RUN: report.pdf (3 records, 4 lines scanned)\n"));
        assert!(out.contains(" [1]  US0378331005  Apple Inc\n"));
        assert!(out.contains(" [2]  DE000BASF111  BASF SE\n"));
        assert!(out.contains(" [3]  US5949181045  (no name)\n"));
        assert!(out.ends_with("Total: 3 records (3 matched lines, 1 with empty names, 0 skipped)\n"));
    }
}
