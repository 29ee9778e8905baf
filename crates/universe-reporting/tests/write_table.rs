use std::sync::Mutex;

use universe_core::{Diagnostic, ErrorKind, NullReporter, ParseOptions, Record, parse_records};
use universe_reporting::{WriteOutcome, write_table};

const SCENARIO: &str = "US0378331005  Apple Inc\nNot a match\nDE000BASF111 BASF SE\n";

#[test]
fn writes_expected_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("trading_universe.csv");
    let table = parse_records(SCENARIO, &ParseOptions::default());

    let outcome = write_table(&table, &out, &NullReporter).unwrap();

    assert_eq!(outcome, WriteOutcome::Written { rows: 2 });
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "ISIN,Name\nUS0378331005,Apple Inc\nDE000BASF111,BASF SE\n"
    );
}

#[test]
fn empty_table_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("trading_universe.csv");
    let table = parse_records("", &ParseOptions::default());
    let seen = Mutex::new(Vec::new());
    let reporter = |d: &Diagnostic| seen.lock().unwrap().push(d.clone());

    let outcome = write_table(&table, &out, &reporter).unwrap();

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(!out.exists());
    assert_eq!(seen.into_inner().unwrap(), vec![Diagnostic::NothingToWrite]);
}

#[test]
fn empty_table_leaves_existing_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("trading_universe.csv");
    std::fs::write(&out, "previous run\n").unwrap();

    write_table(&Default::default(), &out, &NullReporter).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous run\n");
}

#[test]
fn round_trip_preserves_pairs_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("universe.csv");
    let text = "\
IE00B4L5Y983 iShares Core MSCI World UCITS ETF USD (Acc)
US30303M1027 Meta Platforms, Inc.
US0000000001 The \"Quoted\" Company
US0378331005
DE0007164600 SAP SE
US0378331005 Apple Inc";
    let table = parse_records(text, &ParseOptions::default());
    write_table(&table, &out, &NullReporter).unwrap();

    let mut reader = csv::Reader::from_path(&out).unwrap();
    assert_eq!(reader.headers().unwrap(), vec!["ISIN", "Name"]);
    let read: Vec<Record> = reader.deserialize().map(Result::unwrap).collect();

    assert_eq!(read, table.records);
    assert_eq!(read.len(), 5);
}

#[test]
fn rewriting_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("universe.csv");
    let table = parse_records(SCENARIO, &ParseOptions::default());

    write_table(&table, &out, &NullReporter).unwrap();
    let first = std::fs::read(&out).unwrap();
    write_table(&table, &out, &NullReporter).unwrap();
    let second = std::fs::read(&out).unwrap();

    assert_eq!(first, second);
}

#[test]
fn truncates_longer_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("universe.csv");
    std::fs::write(&out, "x".repeat(4096)).unwrap();
    let table = parse_records("US0378331005 Apple Inc", &ParseOptions::default());

    write_table(&table, &out, &NullReporter).unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "ISIN,Name\nUS0378331005,Apple Inc\n"
    );
}

#[test]
fn unwritable_destination_is_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no-such-dir").join("universe.csv");
    let table = parse_records(SCENARIO, &ParseOptions::default());
    let seen = Mutex::new(Vec::new());
    let reporter = |d: &Diagnostic| seen.lock().unwrap().push(d.clone());

    let err = write_table(&table, &out, &reporter).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WriteFailure);
    let seen = seen.into_inner().unwrap();
    assert!(matches!(seen.last(), Some(Diagnostic::WriteFailed { .. })));
}
