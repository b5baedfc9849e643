//! Column mapping state for the KINAI upload workflow.
//!
//! [`MappingState`] holds one [`ColumnMapping`] per schema field and keeps
//! the assignment one-to-one: a CSV column can back at most one field.
//! Completeness is derived on every call from the active registry.
//!
//! [`ColumnMapping`]: kinai_model::ColumnMapping

mod error;
mod state;

pub use error::{MappingError, Result};
pub use state::{MappingState, MappingSummary};
