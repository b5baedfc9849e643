//! Session error type.

use kinai_ingest::IngestError;
use kinai_map::MappingError;
use kinai_predict::PredictError;
use thiserror::Error;

/// Errors surfaced by [`AnalysisSession`](crate::AnalysisSession).
///
/// None of them leave the table or mappings half-updated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The uploaded file could not be parsed; the session is back to no file.
    #[error(transparent)]
    Parse(#[from] IngestError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The prediction API call failed; table and mappings are kept.
    #[error(transparent)]
    Remote(#[from] PredictError),

    #[error("no CSV file is loaded")]
    NoActiveTable,

    #[error("a file is already being loaded")]
    LoadInProgress,

    /// The load was cancelled or superseded before it finished.
    #[error("load {0} is no longer current")]
    StaleLoad(u64),
}

impl SessionError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Parse(e) => e.user_message(),
            Self::Remote(e) => e.user_message(),
            Self::Mapping(MappingError::IncompleteMapping { .. }) => {
                "Please map all required fields before continuing."
            }
            Self::Mapping(MappingError::ColumnAlreadyMapped { .. }) => {
                "This column is already mapped to another field."
            }
            Self::Mapping(_) => "That mapping is not possible for this file.",
            Self::NoActiveTable => "Please upload a CSV file first.",
            Self::LoadInProgress => "Please wait for the current file to finish loading.",
            Self::StaleLoad(_) => "The file upload was cancelled.",
        }
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
