//! Error types for model construction.

use thiserror::Error;

/// Errors raised while building or loading schema registries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Two fields in one registry share an id.
    #[error("duplicate schema field id '{id}' in registry '{registry}'")]
    DuplicateFieldId { registry: String, id: String },

    /// A field was declared with an empty id.
    #[error("schema field at position {position} in registry '{registry}' has an empty id")]
    EmptyFieldId { registry: String, position: usize },

    /// Data type name is not one of string, number, boolean, date.
    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    /// Registry JSON could not be decoded.
    #[error("invalid schema definition for '{registry}': {message}")]
    InvalidDefinition { registry: String, message: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
