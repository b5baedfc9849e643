//! Raw tabular data parsed from an uploaded CSV.

use serde::Serialize;

/// An uploaded CSV as a header row plus string cells.
///
/// A table is built once and then only read; uploading another file
/// replaces it wholesale. Header names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    total_rows: usize,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let total_rows = rows.len();
        Self {
            headers,
            rows,
            total_rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows, header excluded.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header with this exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Cell at `row`/`column`; `None` when the row is out of range or
    /// shorter than the header.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}
