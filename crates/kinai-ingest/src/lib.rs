//! CSV ingestion for the KINAI mapping workflow.
//!
//! This crate turns uploaded CSV content into a [`RawTable`]:
//!
//! - **Parsing**: [`parse_csv`] handles RFC 4180 quoting, blank lines and a
//!   leading byte-order mark
//! - **File intake**: [`read_csv_file`] applies the upload constraints (`.csv`
//!   extension, 100 MB, encoding) before parsing
//!
//! # Example
//!
//! ```
//! use kinai_ingest::parse_csv;
//!
//! let table = parse_csv("time,flux\n1,0.99\n2,0.98\n").unwrap();
//! assert_eq!(table.headers(), ["time", "flux"]);
//! assert_eq!(table.total_rows(), 2);
//! ```
//!
//! [`RawTable`]: kinai_model::RawTable

mod error;
mod parser;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use parser::{normalize_cell, parse_csv};
pub use reader::{
    MAX_CSV_FILE_SIZE, check_extension, check_file_size, check_file_size_with_limit, read_csv_file,
    read_csv_text, validate_encoding,
};
