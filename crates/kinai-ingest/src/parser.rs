//! CSV text parsing into raw tables.

use csv::{ReaderBuilder, StringRecord};
use kinai_model::RawTable;

use crate::error::{IngestError, Result};

/// Parses CSV text into a [`RawTable`].
///
/// The first non-blank line is the header. Blank lines are skipped and do
/// not count towards `total_rows`. Rows keep their own width; nothing pads
/// or truncates them to the header.
pub fn parse_csv(text: &str) -> Result<RawTable> {
    // Skip BOM if present
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| IngestError::Csv {
            line: e.position().map(csv::Position::line),
            message: e.to_string(),
        })?;
        if is_blank(&record) {
            continue;
        }
        let cells: Vec<String> = record.iter().map(clean_field).collect();
        if headers.is_none() {
            headers = Some(cells);
        } else {
            rows.push(cells);
        }
    }

    let headers = headers.ok_or(IngestError::EmptyInput)?;
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeader);
    }

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        "parsed CSV content"
    );

    Ok(RawTable::new(headers, rows))
}

/// Normalizes a cell: trims whitespace, then strips one pair of enclosing
/// double quotes left over from loosely quoted input.
pub fn normalize_cell(value: &str) -> String {
    let trimmed = value.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.to_string()
}

/// Trims a decoded field. Loose quotes are stripped only when leading
/// whitespace stopped the reader from treating them as quoting, so `""`
/// escapes in properly quoted fields survive.
fn clean_field(field: &str) -> String {
    if field.starts_with(char::is_whitespace) {
        normalize_cell(field)
    } else {
        field.trim().to_string()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1
}
