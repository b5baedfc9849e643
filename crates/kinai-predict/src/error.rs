//! Error types for prediction requests.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while calling the prediction API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PredictError {
    /// The request did not reach the API or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The body's `error` member, or a generic status message.
        message: String,
    },

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The response body is JSON but not a prediction object.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Failed to load the API configuration file.
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl PredictError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => {
                "Could not reach the prediction service. Please check that it is running."
            }
            Self::Status { message, .. } => message,
            Self::JsonParse(_) | Self::InvalidResponse(_) => {
                "The prediction service returned an unexpected response."
            }
            Self::ClientBuild(_) | Self::Config { .. } => "An unexpected error occurred.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for prediction operations.
pub type Result<T> = std::result::Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = PredictError::Network("connection refused".to_string());
        assert!(err.user_message().contains("prediction service"));

        let err = PredictError::Status {
            status: 400,
            message: "Missing required columns".to_string(),
        };
        assert_eq!(err.user_message(), "Missing required columns");
        assert_eq!(err.to_string(), "Missing required columns");
    }

    #[test]
    fn test_retryable() {
        assert!(PredictError::Network("timeout".to_string()).is_retryable());
        assert!(
            PredictError::Status {
                status: 503,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !PredictError::Status {
                status: 422,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!PredictError::InvalidResponse("[]".to_string()).is_retryable());
    }
}
