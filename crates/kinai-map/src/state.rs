//! Mapping state management for the interactive mapping dialog.
//!
//! This module tracks which CSV column backs each schema field, which
//! columns are still free, and the "n of m required" summary counts.

use std::collections::HashSet;

use kinai_model::{ColumnMapping, SchemaRegistry};
use serde::Serialize;

use crate::error::{MappingError, Result};

/// Mapping list for one uploaded table.
///
/// Holds exactly one [`ColumnMapping`] per schema field, in schema order,
/// plus the table's header names. No two mappings share a non-empty column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingState {
    mappings: Vec<ColumnMapping>,
    columns: Vec<String>,
}

impl MappingState {
    /// Create a state with every field of `schema` unmapped.
    pub fn new(schema: &SchemaRegistry, headers: &[String]) -> Self {
        let mut state = Self::default();
        state.initialize(schema, headers);
        state
    }

    /// Reset to one unmapped entry per schema field, for a new table.
    pub fn initialize(&mut self, schema: &SchemaRegistry, headers: &[String]) {
        self.mappings = schema
            .fields()
            .iter()
            .map(|field| ColumnMapping::unmapped(field.id.clone()))
            .collect();
        self.columns = headers.to_vec();

        tracing::debug!(
            registry = schema.name(),
            fields = self.mappings.len(),
            columns = self.columns.len(),
            "initialized column mappings"
        );
    }

    /// Drop every mapping and column.
    pub fn reset(&mut self) {
        self.mappings.clear();
        self.columns.clear();
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    /// Header names of the table being mapped.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mapping_for(&self, schema_id: &str) -> Option<&ColumnMapping> {
        self.mappings.iter().find(|m| m.schema_id() == schema_id)
    }

    /// The column currently mapped to a field.
    pub fn column_for(&self, schema_id: &str) -> Option<&str> {
        self.mapping_for(schema_id).and_then(ColumnMapping::column)
    }

    /// Assign `csv_column` to a field. An empty column clears the mapping.
    ///
    /// Fails without changing anything when the field is unknown, the
    /// column is not a header of the table, or another field holds it.
    pub fn update(&mut self, schema_id: &str, csv_column: &str) -> Result<()> {
        if csv_column.is_empty() {
            return self.clear(schema_id);
        }

        let index = self.position(schema_id)?;
        if self.mappings[index].column() == Some(csv_column) {
            return Ok(());
        }
        if !self.columns.iter().any(|c| c == csv_column) {
            return Err(MappingError::ColumnNotFound(csv_column.to_string()));
        }
        if let Some(holder) = self
            .mappings
            .iter()
            .find(|m| m.schema_id() != schema_id && m.column() == Some(csv_column))
        {
            return Err(MappingError::ColumnAlreadyMapped {
                column: csv_column.to_string(),
                field: holder.schema_id().to_string(),
            });
        }

        self.mappings[index].assign(csv_column);
        tracing::debug!(field = schema_id, column = csv_column, "mapped column");
        Ok(())
    }

    /// Clear the mapping for a field.
    pub fn clear(&mut self, schema_id: &str) -> Result<()> {
        let index = self.position(schema_id)?;
        self.mappings[index].clear();
        tracing::debug!(field = schema_id, "cleared column mapping");
        Ok(())
    }

    /// Columns mapped to any field other than `except`.
    pub fn used_columns(&self, except: Option<&str>) -> Vec<&str> {
        self.mappings
            .iter()
            .filter(|m| except != Some(m.schema_id()))
            .filter_map(ColumnMapping::column)
            .collect()
    }

    /// Columns selectable for a field, in header order.
    ///
    /// The field's own current column stays selectable.
    pub fn available_columns(&self, schema_id: &str) -> Vec<&str> {
        let used: HashSet<&str> = self.used_columns(Some(schema_id)).into_iter().collect();
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !used.contains(c))
            .collect()
    }

    pub fn is_column_available(&self, column: &str, schema_id: &str) -> bool {
        !self.used_columns(Some(schema_id)).contains(&column)
    }

    /// True when every required field of `schema` has a column.
    pub fn is_complete(&self, schema: &SchemaRegistry) -> bool {
        schema
            .required_fields()
            .all(|field| self.column_for(&field.id).is_some())
    }

    /// Ids of required fields without a column, in schema order.
    pub fn missing_required<'a>(&self, schema: &'a SchemaRegistry) -> Vec<&'a str> {
        schema
            .required_fields()
            .filter(|field| self.column_for(&field.id).is_none())
            .map(|field| field.id.as_str())
            .collect()
    }

    /// Gate for "proceed": fails with the missing required field ids.
    pub fn require_complete(&self, schema: &SchemaRegistry) -> Result<()> {
        let missing = self.missing_required(schema);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MappingError::IncompleteMapping {
                missing: missing.into_iter().map(str::to_string).collect(),
            })
        }
    }

    /// Get summary counts.
    pub fn summary(&self, schema: &SchemaRegistry) -> MappingSummary {
        let required_total = schema.required_fields().count();
        let required_mapped = schema
            .required_fields()
            .filter(|field| self.column_for(&field.id).is_some())
            .count();

        MappingSummary {
            total_fields: schema.len(),
            mapped: self.mappings.iter().filter(|m| m.column().is_some()).count(),
            required_total,
            required_mapped,
        }
    }

    /// Map still-unmapped fields to unused headers with a matching name.
    ///
    /// A header matches when it equals the field id or label, ignoring ASCII
    /// case and surrounding whitespace. Returns the number of new mappings.
    pub fn auto_map(&mut self, schema: &SchemaRegistry) -> usize {
        let mut assigned = 0;

        for field in schema.fields() {
            let Ok(index) = self.position(&field.id) else {
                continue;
            };
            if self.mappings[index].column().is_some() {
                continue;
            }

            let used: HashSet<&str> = self.used_columns(None).into_iter().collect();
            let candidate = self
                .columns
                .iter()
                .find(|header| {
                    let name = header.trim();
                    !used.contains(header.as_str())
                        && (name.eq_ignore_ascii_case(&field.id)
                            || name.eq_ignore_ascii_case(field.label.trim()))
                })
                .cloned();

            if let Some(column) = candidate {
                tracing::debug!(field = %field.id, column = %column, "auto-mapped column");
                self.mappings[index].assign(column);
                assigned += 1;
            }
        }

        assigned
    }

    fn position(&self, schema_id: &str) -> Result<usize> {
        self.mappings
            .iter()
            .position(|m| m.schema_id() == schema_id)
            .ok_or_else(|| MappingError::FieldNotFound(schema_id.to_string()))
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    /// Total number of fields in the registry.
    pub total_fields: usize,
    /// Number of fields with a column.
    pub mapped: usize,
    /// Total required fields.
    pub required_total: usize,
    /// Required fields that are mapped.
    pub required_mapped: usize,
}

impl MappingSummary {
    pub fn is_complete(&self) -> bool {
        self.required_mapped == self.required_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinai_model::light_curve_schema;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn initialize_creates_unmapped_entries_in_schema_order() {
        let schema = light_curve_schema();
        let state = MappingState::new(&schema, &headers(&["a", "b"]));
        let ids: Vec<&str> = state.mappings().iter().map(ColumnMapping::schema_id).collect();
        assert_eq!(ids, vec!["time", "flux", "flux_error", "quality_flag"]);
        assert!(state.mappings().iter().all(|m| !m.is_mapped()));
        assert!(!state.is_complete(&schema));
    }

    #[test]
    fn reassigning_own_column_is_noop() {
        let schema = light_curve_schema();
        let mut state = MappingState::new(&schema, &headers(&["t"]));
        state.update("time", "t").unwrap();
        state.update("time", "t").unwrap();
        assert_eq!(state.column_for("time"), Some("t"));
    }

    #[test]
    fn update_unknown_field_or_column_fails() {
        let schema = light_curve_schema();
        let mut state = MappingState::new(&schema, &headers(&["t"]));
        assert_eq!(
            state.update("depth", "t"),
            Err(MappingError::FieldNotFound("depth".to_string()))
        );
        assert_eq!(
            state.update("time", "missing"),
            Err(MappingError::ColumnNotFound("missing".to_string()))
        );
        assert_eq!(state.summary(&schema).mapped, 0);
    }

    #[test]
    fn empty_column_clears() {
        let schema = light_curve_schema();
        let mut state = MappingState::new(&schema, &headers(&["t"]));
        state.update("time", "t").unwrap();
        state.update("time", "").unwrap();
        assert_eq!(state.column_for("time"), None);
        assert!(!state.mapping_for("time").unwrap().is_mapped());
    }

    #[test]
    fn summary_counts_required() {
        let schema = light_curve_schema();
        let mut state = MappingState::new(&schema, &headers(&["t", "f"]));
        state.update("time", "t").unwrap();
        state.update("flux", "f").unwrap();
        let summary = state.summary(&schema);
        assert_eq!(
            summary,
            MappingSummary {
                total_fields: 4,
                mapped: 2,
                required_total: 4,
                required_mapped: 2,
            }
        );
        assert!(!summary.is_complete());
    }

    #[test]
    fn reset_empties_state() {
        let schema = light_curve_schema();
        let mut state = MappingState::new(&schema, &headers(&["t"]));
        state.update("time", "t").unwrap();
        state.reset();
        assert!(state.is_empty());
        assert!(state.columns().is_empty());
        assert!(!state.is_complete(&schema));
    }
}
