//! Error types for CSV ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or parsing an uploaded CSV.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === Parsing Errors ===
    /// Input has no non-blank line.
    #[error("CSV content is empty")]
    EmptyInput,

    /// The header line has no non-empty column name.
    #[error("CSV content has no header line")]
    NoHeader,

    /// Malformed CSV record.
    #[error("failed to parse CSV{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Csv { line: Option<u64>, message: String },

    // === File Intake Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only `.csv` files are accepted.
    #[error("{path} is not a .csv file")]
    NotCsvFile { path: PathBuf },

    /// File exceeds the upload size limit.
    #[error("file {path} is too large ({size} bytes, limit {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File starts with a byte-order mark for an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path}; save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// File content is not valid UTF-8.
    #[error("file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

impl IngestError {
    /// Returns a message suitable for showing next to the upload control.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmptyInput | Self::NoHeader => {
                "The file is empty or has no header row."
            }
            Self::Csv { .. } => "The file could not be read as CSV.",
            Self::FileNotFound { .. } | Self::FileRead { .. } => "The file could not be opened.",
            Self::NotCsvFile { .. } => "Only .csv files can be uploaded.",
            Self::FileTooLarge { .. } => "The file is too large (100 MB maximum).",
            Self::UnsupportedEncoding { .. } | Self::InvalidUtf8 { .. } => {
                "The file must be UTF-8 encoded text."
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
