//! Mapped-row materialization for preview and submission.

use kinai_model::{ColumnMapping, DataType, MappedRow, RawTable, SchemaRegistry};
use serde::Serialize;

use crate::coerce::{CoercionFallback, coerce_with_report};

/// Number of rows shown in the mapping preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// A cell that was replaced by a default value during materialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionWarning {
    /// Zero-based data row index.
    pub row: usize,
    pub schema_id: String,
    pub raw: String,
    pub fallback: CoercionFallback,
}

/// Materialized rows plus every fallback applied while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterializeReport {
    pub rows: Vec<MappedRow>,
    pub warnings: Vec<CoercionWarning>,
}

impl MaterializeReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A mapped field resolved against the table headers.
struct ResolvedColumn<'a> {
    schema_id: &'a str,
    index: usize,
    data_type: DataType,
}

/// Builds one [`MappedRow`] per data row, up to `row_limit` rows.
///
/// Only mapped fields appear in the output. A mapping whose column is not a
/// table header is skipped; a mapping for a field outside `schema` is kept
/// as text. With duplicate header names the first match wins.
pub fn materialize(
    table: &RawTable,
    mappings: &[ColumnMapping],
    schema: &SchemaRegistry,
    row_limit: usize,
) -> Vec<MappedRow> {
    materialize_with_report(table, mappings, schema, row_limit).rows
}

/// Materializes the preview window of [`DEFAULT_PREVIEW_ROWS`] rows.
pub fn preview(
    table: &RawTable,
    mappings: &[ColumnMapping],
    schema: &SchemaRegistry,
) -> Vec<MappedRow> {
    materialize(table, mappings, schema, DEFAULT_PREVIEW_ROWS)
}

/// Like [`materialize`], also collecting a warning per substituted cell.
pub fn materialize_with_report(
    table: &RawTable,
    mappings: &[ColumnMapping],
    schema: &SchemaRegistry,
    row_limit: usize,
) -> MaterializeReport {
    let columns = resolve_columns(table, mappings, schema);
    let mut report = MaterializeReport::default();

    for (row_index, cells) in table.rows().iter().take(row_limit).enumerate() {
        let mut row = MappedRow::new();
        for column in &columns {
            let raw = cells.get(column.index).map_or("", String::as_str);
            let coerced = coerce_with_report(raw, column.data_type);
            if let Some(fallback) = coerced.fallback {
                tracing::trace!(
                    row = row_index,
                    field = column.schema_id,
                    raw,
                    %fallback,
                    "substituted default value"
                );
                report.warnings.push(CoercionWarning {
                    row: row_index,
                    schema_id: column.schema_id.to_string(),
                    raw: raw.to_string(),
                    fallback,
                });
            }
            row.insert(column.schema_id, coerced.value);
        }
        report.rows.push(row);
    }

    if report.has_warnings() {
        tracing::warn!(
            cells = report.warnings.len(),
            rows = report.rows.len(),
            "some cells could not be converted and were replaced by defaults"
        );
    }
    tracing::debug!(
        rows = report.rows.len(),
        fields = columns.len(),
        "materialized mapped rows"
    );

    report
}

fn resolve_columns<'a>(
    table: &RawTable,
    mappings: &'a [ColumnMapping],
    schema: &SchemaRegistry,
) -> Vec<ResolvedColumn<'a>> {
    mappings
        .iter()
        .filter_map(|mapping| {
            let column = mapping.column()?;
            let Some(index) = table.column_index(column) else {
                tracing::debug!(
                    field = mapping.schema_id(),
                    column,
                    "mapped column missing from table, skipped"
                );
                return None;
            };
            let data_type = schema
                .field(mapping.schema_id())
                .map_or(DataType::String, |field| field.data_type);
            Some(ResolvedColumn {
                schema_id: mapping.schema_id(),
                index,
                data_type,
            })
        })
        .collect()
}
