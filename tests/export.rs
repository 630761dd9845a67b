// tests/export.rs
//
// RecordWriter against files and in-memory buffers, and a full
// sync-to-CSV run without the network.
//
mod common;

use std::fs;

use common::*;
use mph_sync::config::options::{ExportFormat, ExportOptions};
use mph_sync::file::RecordWriter;
use mph_sync::{sync, TransactionRecord};

fn rec(id: &str) -> TransactionRecord {
    TransactionRecord {
        id: id.into(),
        date: "2018-04-22 10:11:12".into(),
        kind: "Credit".into(),
        confirmations: "Confirmed".into(),
        amount: "0.01".into(),
        ..TransactionRecord::default()
    }
}

fn to_string(w: RecordWriter<Vec<u8>>) -> String {
    String::from_utf8(w.into_inner().unwrap()).unwrap()
}

#[test]
fn file_output_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger").join("2018").join("ltc.csv");
    let export = ExportOptions { out: Some(path.clone()), ..ExportOptions::default() };

    let mut w = RecordWriter::open(&export).unwrap();
    w.write(&rec("2")).unwrap();
    w.write(&rec("1")).unwrap();
    assert_eq!(w.rows_written(), 2);
    drop(w.into_inner().unwrap());

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,Date,TX Type,Status,Payment Address,TX #,Block #,Amount");
    assert_eq!(lines[1], "2,2018-04-22 10:11:12,Credit,Confirmed,,,,0.01");
}

#[test]
fn file_output_truncates_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ltc.csv");
    fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();
    let export = ExportOptions { out: Some(path.clone()), include_headers: false, ..ExportOptions::default() };

    let mut w = RecordWriter::open(&export).unwrap();
    w.write(&rec("9")).unwrap();
    drop(w.into_inner().unwrap());

    assert_eq!(fs::read_to_string(&path).unwrap(), "9,2018-04-22 10:11:12,Credit,Confirmed,,,,0.01\n");
}

#[test]
fn out_path_through_a_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    fs::write(&blocker, "").unwrap();
    let export = ExportOptions { out: Some(blocker.join("ltc.csv")), ..ExportOptions::default() };

    assert!(RecordWriter::open(&export).is_err());
}

#[test]
fn page_headers_win_over_canonical_names() {
    let mut w = RecordWriter::new(Vec::new(), &ExportOptions::default());
    let page: Vec<String> = ["Id", "When", "Kind", "State", "To", "Tx", "Blk", "Amt"]
        .map(String::from)
        .to_vec();
    w.write_header(Some(page.as_slice())).unwrap();
    // a second header call is a no-op
    w.write_header(None).unwrap();
    w.write(&rec("5")).unwrap();

    let text = to_string(w);
    assert!(text.starts_with("Id,When,Kind,State,To,Tx,Blk,Amt\n5,"));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn no_headers_writes_rows_only() {
    let export = ExportOptions { include_headers: false, ..ExportOptions::default() };
    let mut w = RecordWriter::new(Vec::new(), &export);
    w.write_header(Some(&["ID".to_string()][..])).unwrap();
    w.write(&rec("5")).unwrap();

    assert_eq!(to_string(w), "5,2018-04-22 10:11:12,Credit,Confirmed,,,,0.01\n");
}

#[test]
fn header_only_when_nothing_new() {
    let mut w = RecordWriter::new(Vec::new(), &ExportOptions::default());
    w.write_header(None).unwrap();
    assert_eq!(w.rows_written(), 0);
    assert_eq!(to_string(w).lines().count(), 1);
}

#[test]
fn tsv_uses_tabs() {
    let export = ExportOptions { format: ExportFormat::Tsv, ..ExportOptions::default() };
    let mut w = RecordWriter::new(Vec::new(), &export);
    w.write(&rec("5")).unwrap();

    let text = to_string(w);
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("ID\tDate\tTX Type"));
    assert_eq!(lines.next(), Some("5\t2018-04-22 10:11:12\tCredit\tConfirmed\t\t\t\t0.01"));
}

#[test]
fn sync_into_csv_end_to_end() {
    let mut pool = FakePool::new(
        vec![
            Row::payment("12", "LTCaddrXYZ", "deadbeefcafe"),
            Row::credit("11"),
            Row::marker("10"),
            Row::credit("9"),
        ],
        2,
    );

    let mut run = sync(&mut pool, "litecoin", Some("9"), fast());
    let mut w = RecordWriter::new(Vec::new(), &ExportOptions::default());
    let first = run.next();
    w.write_header(run.headers()).unwrap();
    for item in first.into_iter().chain(run.by_ref()) {
        w.write(&item.unwrap()).unwrap();
    }
    assert_eq!(w.rows_written(), 3);
    drop(run);

    let text = to_string(w);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "ID,Date,TX Type,Status,Payment Address,TX #,Block #,Amount");
    assert_eq!(
        lines[1],
        "12,2018-04-22 10:11:12,Credit,Confirmed,LTCaddrXYZ,deadbeefcafe,1234,-1.5"
    );
    assert_eq!(
        lines[3],
        "10,2018-04-22 10:11:12,Credit,Confirmed,(Shrunk accumulated Credit),,1234,3.25"
    );
    assert_eq!(pool.offsets(), vec![0, 2]);
}
