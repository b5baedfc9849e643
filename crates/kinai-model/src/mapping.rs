//! Column mapping between a schema field and a source column.

use serde::{Deserialize, Serialize};

/// The user's choice of source column for one schema field.
///
/// An empty column means the field is unmapped. `mapped` is derived from
/// the column on every write, including deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MappingRecord")]
pub struct ColumnMapping {
    schema_id: String,
    csv_column: String,
    mapped: bool,
}

/// Wire form; any incoming `mapped` flag is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingRecord {
    schema_id: String,
    #[serde(default)]
    csv_column: String,
}

impl From<MappingRecord> for ColumnMapping {
    fn from(record: MappingRecord) -> Self {
        Self::to_column(record.schema_id, record.csv_column)
    }
}

impl ColumnMapping {
    pub fn unmapped(schema_id: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.into(),
            csv_column: String::new(),
            mapped: false,
        }
    }

    pub fn to_column(schema_id: impl Into<String>, csv_column: impl Into<String>) -> Self {
        let mut mapping = Self::unmapped(schema_id);
        mapping.assign(csv_column);
        mapping
    }

    /// Sets the source column; an empty string clears the mapping.
    pub fn assign(&mut self, csv_column: impl Into<String>) {
        self.csv_column = csv_column.into();
        self.mapped = !self.csv_column.is_empty();
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Raw column text; empty when unmapped.
    pub fn csv_column(&self) -> &str {
        &self.csv_column
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn clear(&mut self) {
        self.assign(String::new());
    }

    /// The mapped column, if any.
    pub fn column(&self) -> Option<&str> {
        self.mapped.then_some(self.csv_column.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_tracks_mapped_flag() {
        let mut mapping = ColumnMapping::unmapped("flux");
        assert!(!mapping.is_mapped());
        assert_eq!(mapping.column(), None);

        mapping.assign("FLUX_NORM");
        assert!(mapping.is_mapped());
        assert_eq!(mapping.column(), Some("FLUX_NORM"));

        mapping.assign("");
        assert!(!mapping.is_mapped());
        assert_eq!(mapping.column(), None);
    }

    #[test]
    fn deserialized_flag_follows_column() {
        let mapping: ColumnMapping =
            serde_json::from_str(r#"{"schemaId":"time","csvColumn":"","mapped":true}"#).unwrap();
        assert!(!mapping.is_mapped());
        assert_eq!(mapping.column(), None);

        let mapping: ColumnMapping =
            serde_json::from_str(r#"{"schemaId":"time","csvColumn":"TIME","mapped":false}"#)
                .unwrap();
        assert!(mapping.is_mapped());
        assert_eq!(mapping.column(), Some("TIME"));

        let mapping: ColumnMapping = serde_json::from_str(r#"{"schemaId":"flux"}"#).unwrap();
        assert_eq!(mapping.schema_id(), "flux");
        assert_eq!(mapping.csv_column(), "");
    }
}
