//! Data model for the KINAI exoplanet CSV mapping workflow.
//!
//! This crate holds the types shared by every stage of the workflow:
//!
//! - [`SchemaField`] and [`DataType`]: typed target attributes
//! - [`SchemaRegistry`] and [`AnalysisMode`]: the fixed, ordered field lists
//! - [`RawTable`]: an uploaded CSV as header + string cells
//! - [`ColumnMapping`]: the user's choice of source column for a field
//! - [`CellValue`] and [`MappedRow`]: coerced values produced for preview
//!   and submission

pub mod error;
pub mod mapping;
pub mod registry;
pub mod schema;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use mapping::ColumnMapping;
pub use registry::{AnalysisMode, SchemaRegistry, extended_schema, light_curve_schema};
pub use schema::{DataType, SchemaField};
pub use table::RawTable;
pub use value::{CellValue, MappedRow};
