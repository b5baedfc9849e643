use std::fs;
use std::path::PathBuf;

use kinai_ingest::{IngestError, parse_csv, read_csv_file};
use proptest::prelude::*;

fn temp_file(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    (dir, path)
}

#[test]
fn reads_light_curve_upload() {
    let (_dir, path) = temp_file(
        "kepler.csv",
        "TIME,PDCSAP_FLUX,PDCSAP_FLUX_ERR,SAP_QUALITY\n\
         131.512,0.9991,0.0004,0\n\
         131.533,0.9987,0.0004,0\n\
         131.553,1.0002,0.0004,128\n",
    );
    let table = read_csv_file(&path).expect("read csv");
    assert_eq!(
        table.headers(),
        ["TIME", "PDCSAP_FLUX", "PDCSAP_FLUX_ERR", "SAP_QUALITY"]
    );
    assert_eq!(table.total_rows(), 3);
    assert_eq!(table.cell(2, 3), Some("128"));
}

#[test]
fn reads_extended_upload_with_quoted_views() {
    let (_dir, path) = temp_file(
        "koi.csv",
        "kepid,global_view,local_view\n\
         10797460,\"[0.1, 0.2, 0.3]\",\"[0.5, 0.4]\"\n",
    );
    let table = read_csv_file(&path).expect("read csv");
    assert_eq!(table.rows()[0][1], "[0.1, 0.2, 0.3]");
    assert_eq!(table.rows()[0][2], "[0.5, 0.4]");
}

#[test]
fn duplicate_headers_are_kept() {
    let table = parse_csv("flux,flux\n1,2\n").expect("parse");
    assert_eq!(table.headers(), ["flux", "flux"]);
    assert_eq!(table.column_index("flux"), Some(0));
}

#[test]
fn unterminated_quote_still_yields_table() {
    let table = parse_csv("a,b\n1,\"open\n").expect("parse");
    assert_eq!(table.headers(), ["a", "b"]);
    assert_eq!(table.total_rows(), 1);
}

#[test]
fn empty_file_is_rejected() {
    let (_dir, path) = temp_file("empty.csv", "\n\n");
    let err = read_csv_file(&path).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput));
    assert_eq!(err.user_message(), "The file is empty or has no header row.");
}

fn arb_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    prop::collection::vec("[a-z]{1,8}", 1..6).prop_flat_map(|headers| {
        let width = headers.len();
        let rows = prop::collection::vec(prop::collection::vec("[a-z0-9.]{1,6}", width), 0..20);
        (Just(headers), rows)
    })
}

proptest! {
    #[test]
    fn parse_counts_every_non_blank_row((headers, rows) in arb_table()) {
        let mut text = headers.join(",");
        text.push('\n');
        for row in &rows {
            text.push_str(&row.join(","));
            text.push_str("\n\n");
        }

        let table = parse_csv(&text).unwrap();
        prop_assert_eq!(table.headers(), headers.as_slice());
        prop_assert_eq!(table.total_rows(), rows.len());
        prop_assert_eq!(table.rows(), rows.as_slice());
    }
}
