use once_cell::sync::Lazy;
use regex::Regex;

use crate::{ParseStats, Record, RecordTable};

/// A line that starts with an ISIN-shaped code, at least one blank on the same
/// line, then the rest of the line. A `\r` before the line break is not part of
/// the separator or the name, so CRLF and LF text parse the same.
static ISIN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([A-Z]{2}[A-Z0-9]{10})[^\S\r\n]+([^\r\n]*)\r?$").unwrap()
});

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Drop matched lines that have nothing but whitespace after the code.
    pub skip_empty_names: bool,
}

/// Scan `text` for lines beginning with an ISIN and split each into (code, name).
///
/// Records come out in line order, duplicates included. No match is not an
/// error: the table is simply empty.
pub fn parse_records(text: &str, options: &ParseOptions) -> RecordTable {
    let mut stats = ParseStats {
        lines_scanned: text.lines().count(),
        ..ParseStats::default()
    };
    let mut records = Vec::new();

    for caps in ISIN_LINE.captures_iter(text) {
        stats.matched += 1;
        let isin = &caps[1];
        let name = caps[2].trim();

        if name.is_empty() {
            stats.empty_names += 1;
            if options.skip_empty_names {
                stats.skipped_empty += 1;
                tracing::trace!(isin, "skipping record with empty name");
                continue;
            }
        }

        records.push(Record::new(isin, name));
    }

    tracing::debug!(
        lines = stats.lines_scanned,
        matched = stats.matched,
        kept = records.len(),
        "parsed ISIN records"
    );

    RecordTable { records, stats }
}
