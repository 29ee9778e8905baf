use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extract;
pub mod mock;
pub mod parser;
pub mod report;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use config_file::WriteFailurePolicy;
pub use extract::extract_text;
pub use parser::{ParseOptions, parse_records};
pub use report::{Diagnostic, NullReporter, Reporter, TracingReporter};

/// Default output path when neither the CLI nor a config file names one.
pub const DEFAULT_OUTPUT: &str = "trading_universe.csv";

/// A single security listed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ISIN")]
    pub isin: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl Record {
    pub fn new(isin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            isin: isin.into(),
            name: name.into(),
        }
    }
}

/// Counters collected while scanning the text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_scanned: usize,
    pub matched: usize,
    /// Matched lines whose name was empty after trimming.
    pub empty_names: usize,
    /// Empty-name records dropped because `skip_empty_names` was set.
    pub skipped_empty: usize,
}

/// Result of parsing a document: records in source order.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    pub records: Vec<Record>,
    pub stats: ParseStats,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Coarse classification of [`UniverseError`], used to pick exit codes and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnreadableDocument,
    WriteFailure,
    Unknown,
}

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("cannot read PDF {}: {source}", path.display())]
    UnreadableDocument {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("could not write to file '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Unknown(String),
}

impl UniverseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UniverseError::NotFound { .. } => ErrorKind::NotFound,
            UniverseError::UnreadableDocument { .. } => ErrorKind::UnreadableDocument,
            UniverseError::WriteFailure { .. } => ErrorKind::WriteFailure,
            UniverseError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

/// Settings for a single conversion run, after merging CLI flags and config files.
#[derive(Debug, Clone)]
pub struct Config {
    pub output: PathBuf,
    pub on_write_failure: WriteFailurePolicy,
    pub parse: ParseOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            on_write_failure: WriteFailurePolicy::default(),
            parse: ParseOptions::default(),
        }
    }
}

impl Config {
    /// Apply values from an on-disk config file over the built-in defaults.
    pub fn from_file(file: &config_file::ConfigFile) -> Self {
        let mut config = Config::default();
        if let Some(output) = &file.output {
            if let Some(path) = &output.path {
                config.output = PathBuf::from(path);
            }
            if let Some(policy) = output.on_write_failure {
                config.on_write_failure = policy;
            }
        }
        if let Some(skip) = file.parsing.as_ref().and_then(|p| p.skip_empty_names) {
            config.parse.skip_empty_names = skip;
        }
        config
    }
}
