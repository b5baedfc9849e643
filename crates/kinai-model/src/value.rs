//! Coerced cell values and mapped rows.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A cell value after coercion to its schema field's data type.
///
/// Serializes untagged: text as a string, numbers and booleans natively,
/// valid dates as ISO-8601 strings and invalid dates as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// `None` is the invalid-date sentinel.
    Date(Option<NaiveDateTime>),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_invalid_date(&self) -> bool {
        matches!(self, CellValue::Date(None))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Date(Some(dt)) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            CellValue::Date(None) => write!(f, "Invalid Date"),
        }
    }
}

/// One materialized row: schema field id to coerced value.
///
/// Only mapped fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MappedRow {
    values: BTreeMap<String, CellValue>,
}

impl MappedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema_id: impl Into<String>, value: CellValue) {
        self.values.insert(schema_id.into(), value);
    }

    pub fn get(&self, schema_id: &str) -> Option<&CellValue> {
        self.values.get(schema_id)
    }

    pub fn contains(&self, schema_id: &str) -> bool {
        self.values.contains_key(schema_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for MappedRow {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn dates_serialize_as_iso_or_null() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let valid = serde_json::to_value(CellValue::Date(Some(dt))).unwrap();
        assert_eq!(valid, serde_json::json!("2024-01-15T00:00:00"));
        let invalid = serde_json::to_value(CellValue::Date(None)).unwrap();
        assert!(invalid.is_null());
    }

    #[test]
    fn display_matches_preview_text() {
        assert_eq!(CellValue::Number(1.0).to_string(), "1");
        assert_eq!(CellValue::Number(0.99).to_string(), "0.99");
        assert_eq!(CellValue::Boolean(true).to_string(), "true");
        assert_eq!(CellValue::Date(None).to_string(), "Invalid Date");
    }

    #[test]
    fn row_collects_from_pairs() {
        let row: MappedRow = [("time", CellValue::Number(2.0))].into_iter().collect();
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("time").and_then(CellValue::as_f64), Some(2.0));
        assert!(!row.contains("flux"));
    }
}
