use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use kinai_map::{MappingState, MappingSummary};
use kinai_model::{CellValue, MappedRow, SchemaRegistry};
use kinai_predict::PredictionResponse;
use kinai_transform::CoercionWarning;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn print_schema(schema: &SchemaRegistry) {
    println!("Registry: {}", schema.name());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Example"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in schema.fields() {
        let required = if field.required {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(&field.id).add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            Cell::new(field.data_type),
            required,
            field
                .example
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

/// Prints the mapping state as one row per schema field.
pub fn print_mapping(schema: &SchemaRegistry, mapping: &MappingState) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Column"),
    ]);
    apply_table_style(&mut table);
    for field in schema.fields() {
        let column = match mapping.column_for(&field.id) {
            Some(column) => Cell::new(column),
            None if field.required => Cell::new("missing")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&field.id),
            Cell::new(field.data_type),
            column,
        ]);
    }
    println!("{table}");
}

pub fn print_mapping_summary(summary: &MappingSummary) {
    println!(
        "Mapped {} of {} fields ({} of {} required)",
        summary.mapped, summary.total_fields, summary.required_mapped, summary.required_total
    );
}

/// Prints coerced rows with one column per mapped field, in registry order.
pub fn print_rows(schema: &SchemaRegistry, rows: &[MappedRow]) {
    let ids: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| field.id.as_str())
        .filter(|id| rows.iter().any(|row| row.contains(id)))
        .collect();
    if ids.is_empty() {
        println!("No mapped fields to preview.");
        return;
    }

    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(ids.iter().map(|id| header_cell(id)));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, row) in rows.iter().enumerate() {
        let mut cells = vec![dim_cell(index + 1)];
        cells.extend(ids.iter().map(|id| value_cell(row.get(id))));
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn print_warnings(warnings: &[CoercionWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("Values replaced during conversion: {}", warnings.len());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Raw"),
        header_cell("Fallback"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.row + 1),
            Cell::new(&warning.schema_id),
            Cell::new(format!("{:?}", warning.raw)),
            Cell::new(warning.fallback).fg(Color::Yellow),
        ]);
    }
    println!("{table}");
}

pub fn print_prediction(response: &PredictionResponse) {
    println!(
        "Predictions: {} total, {} successful, {} failed",
        response.total_predictions,
        response.successful_predictions,
        response.failed_predictions()
    );
    if !response.results.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Search ID"), header_cell("Prediction")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for result in &response.results {
            let prediction = match result.prediction {
                Some(score) => Cell::new(format!("{score:.4}")),
                None => Cell::new("failed").fg(Color::Red),
            };
            table.add_row(vec![Cell::new(&result.search_id), prediction]);
        }
        println!("{table}");
    }
    for error in response.errors.iter().flatten() {
        eprintln!("api: {error}");
    }
}

fn value_cell(value: Option<&CellValue>) -> Cell {
    match value {
        Some(value @ CellValue::Date(None)) => Cell::new(value).fg(Color::Yellow),
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
