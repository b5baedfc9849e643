//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping operations.
///
/// A failed operation leaves the mapping state unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    /// No mapping exists for this schema field.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Column not present in the uploaded table.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column already mapped to another field.
    #[error("Column '{column}' already mapped to '{field}'")]
    ColumnAlreadyMapped {
        /// The column that was already used.
        column: String,
        /// The field currently holding it.
        field: String,
    },

    /// Required fields are still unmapped.
    #[error("Required fields are not mapped: {}", missing.join(", "))]
    IncompleteMapping {
        /// Required field ids without a column, in schema order.
        missing: Vec<String>,
    },
}

impl MappingError {
    /// Get the field id associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound(f) => Some(f),
            Self::ColumnAlreadyMapped { field, .. } => Some(field),
            Self::ColumnNotFound(_) | Self::IncompleteMapping { .. } => None,
        }
    }

    /// Get the column name associated with this error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnNotFound(c) => Some(c),
            Self::ColumnAlreadyMapped { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_missing_fields() {
        let err = MappingError::IncompleteMapping {
            missing: vec!["flux".to_string(), "quality_flag".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Required fields are not mapped: flux, quality_flag"
        );
        assert_eq!(err.field(), None);
    }

    #[test]
    fn already_mapped_exposes_both_names() {
        let err = MappingError::ColumnAlreadyMapped {
            column: "x".to_string(),
            field: "time".to_string(),
        };
        assert_eq!(err.column(), Some("x"));
        assert_eq!(err.field(), Some("time"));
        assert_eq!(err.to_string(), "Column 'x' already mapped to 'time'");
    }
}
