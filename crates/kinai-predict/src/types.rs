//! Request and response payloads of the prediction API.

use std::fmt;

use kinai_model::{AnalysisMode, ColumnMapping, RawTable};
use serde::{Deserialize, Deserializer, Serialize};

/// Which model scores the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionModel {
    Fast,
    Deep,
}

impl PredictionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Deep => "deep",
        }
    }
}

impl From<AnalysisMode> for PredictionModel {
    fn from(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Simple => Self::Fast,
            AnalysisMode::Complex => Self::Deep,
        }
    }
}

impl fmt::Display for PredictionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mapping as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub schema_id: String,
    pub csv_column: String,
}

impl From<&ColumnMapping> for MappingEntry {
    fn from(mapping: &ColumnMapping) -> Self {
        Self {
            schema_id: mapping.schema_id().to_string(),
            csv_column: mapping.csv_column().to_string(),
        }
    }
}

/// Body of a prediction call: every mapping plus the whole uploaded table.
///
/// The table is borrowed; the API applies the mappings itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest<'a> {
    pub mappings: Vec<MappingEntry>,
    pub csv_data: &'a RawTable,
}

impl<'a> PredictionRequest<'a> {
    pub fn new(mappings: &[ColumnMapping], csv_data: &'a RawTable) -> Self {
        Self {
            mappings: mappings.iter().map(MappingEntry::from).collect(),
            csv_data,
        }
    }
}

/// Successful prediction reply. Missing members default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResponse {
    /// One score per input row; `null` where the row could not be scored.
    pub predictions: Vec<Option<f64>>,
    pub total_predictions: u64,
    pub successful_predictions: u64,
    pub results: Vec<PredictionResult>,
    /// Per-row problems reported by the API, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl PredictionResponse {
    pub fn failed_predictions(&self) -> u64 {
        self.total_predictions
            .saturating_sub(self.successful_predictions)
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Candidate identifier; numeric ids are kept as their decimal text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub search_id: String,
    pub prediction: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}
