//! Coercion and materialization of mapped CSV data.
//!
//! - [`coerce`]: raw cell text to a typed [`CellValue`], never failing
//! - [`materialize`] / [`preview`]: mapped rows for display and submission
//! - [`materialize_with_report`]: the same rows plus a record of every cell
//!   that fell back to a default value
//!
//! [`CellValue`]: kinai_model::CellValue

mod coerce;
pub mod datetime;
mod materialize;

pub use coerce::{Coerced, CoercionFallback, coerce, coerce_with_report};
pub use datetime::parse_datetime;
pub use materialize::{
    CoercionWarning, DEFAULT_PREVIEW_ROWS, MaterializeReport, materialize, materialize_with_report,
    preview,
};
