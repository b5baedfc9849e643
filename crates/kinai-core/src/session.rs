//! Analysis session state.

use kinai_ingest::parse_csv;
use kinai_map::{MappingState, MappingSummary};
use kinai_model::{AnalysisMode, MappedRow, RawTable, SchemaRegistry};
use kinai_predict::{PredictionModel, PredictionRequest, PredictionResponse, Predictor};
use kinai_transform::{
    CoercionWarning, DEFAULT_PREVIEW_ROWS, MaterializeReport, materialize_with_report,
};
use tracing::Instrument;

use crate::error::{Result, SessionError};

/// Where the session is in the upload → map → predict sequence.
///
/// Any mapping edit after a submission returns the session to one of the
/// mapping phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No table loaded.
    NoFile,
    /// A table is loaded but required fields are unmapped.
    MappingIncomplete,
    /// Every required field has a column.
    MappingComplete,
    /// A prediction was requested; see [`AnalysisSession::prediction`].
    Submitted,
}

/// Outcome of the last prediction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    Complete(PredictionResponse),
    /// User-facing failure message.
    Failed(String),
}

impl PredictionState {
    pub fn response(&self) -> Option<&PredictionResponse> {
        match self {
            Self::Complete(response) => Some(response),
            _ => None,
        }
    }
}

/// Handle for a file read in progress, issued by [`AnalysisSession::begin_load`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a load ticket must be passed to finish_load or cancel_load"]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One user's analysis of one uploaded CSV.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    mode: AnalysisMode,
    schema: SchemaRegistry,
    table: Option<RawTable>,
    mapping: MappingState,
    mapped_rows: Vec<MappedRow>,
    prediction: PredictionState,
    pending_load: Option<u64>,
    next_ticket: u64,
}

impl AnalysisSession {
    /// Creates an empty session using the mode's built-in registry.
    pub fn new(mode: AnalysisMode) -> Self {
        Self::with_schema(mode, mode.registry())
    }

    /// Creates an empty session with a custom registry.
    pub fn with_schema(mode: AnalysisMode, schema: SchemaRegistry) -> Self {
        Self {
            mode,
            schema,
            table: None,
            mapping: MappingState::default(),
            mapped_rows: Vec::new(),
            prediction: PredictionState::Idle,
            pending_load: None,
            next_ticket: 0,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    pub fn mapping(&self) -> &MappingState {
        &self.mapping
    }

    /// Rows stored by the last [`confirm_mapping`](Self::confirm_mapping).
    pub fn mapped_rows(&self) -> &[MappedRow] {
        &self.mapped_rows
    }

    pub fn prediction(&self) -> &PredictionState {
        &self.prediction
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.table.is_none() {
            SessionPhase::NoFile
        } else if self.prediction != PredictionState::Idle {
            SessionPhase::Submitted
        } else if self.is_complete() {
            SessionPhase::MappingComplete
        } else {
            SessionPhase::MappingIncomplete
        }
    }

    /// Switches analysis mode. The registry is replaced and the upload is
    /// discarded.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        tracing::info!(from = %self.mode, to = %mode, "analysis mode changed");
        self.mode = mode;
        self.schema = mode.registry();
        self.remove_file();
    }

    // === Upload ===

    /// Parses `text` and makes it the active table.
    pub fn load_text(&mut self, text: &str) -> Result<&RawTable> {
        let ticket = self.begin_load()?;
        self.finish_load(ticket, text)
    }

    /// Marks a file read as started. Only one read may be pending.
    pub fn begin_load(&mut self) -> Result<LoadTicket> {
        if self.pending_load.is_some() {
            return Err(SessionError::LoadInProgress);
        }
        self.next_ticket += 1;
        self.pending_load = Some(self.next_ticket);
        tracing::debug!(ticket = self.next_ticket, "file load started");
        Ok(LoadTicket(self.next_ticket))
    }

    /// Completes a pending read with the file's text.
    ///
    /// On a parse error the session returns to [`SessionPhase::NoFile`].
    pub fn finish_load(&mut self, LoadTicket(id): LoadTicket, text: &str) -> Result<&RawTable> {
        if self.pending_load != Some(id) {
            tracing::debug!(ticket = id, "ignoring stale file load");
            return Err(SessionError::StaleLoad(id));
        }
        self.pending_load = None;

        match parse_csv(text) {
            Ok(table) => {
                self.mapping.initialize(&self.schema, table.headers());
                self.mapped_rows.clear();
                self.prediction = PredictionState::Idle;
                tracing::info!(
                    columns = table.headers().len(),
                    rows = table.total_rows(),
                    "file loaded"
                );
                let table = self.table.insert(table);
                Ok(&*table)
            }
            Err(e) => {
                tracing::warn!(error = %e, "file could not be parsed");
                self.remove_file();
                Err(e.into())
            }
        }
    }

    /// Abandons the pending read, if any.
    pub fn cancel_load(&mut self) {
        if let Some(ticket) = self.pending_load.take() {
            tracing::debug!(ticket, "file load cancelled");
        }
    }

    /// Discards the table, mappings, rows and prediction.
    pub fn remove_file(&mut self) {
        self.table = None;
        self.mapping.reset();
        self.mapped_rows.clear();
        self.prediction = PredictionState::Idle;
        self.pending_load = None;
    }

    // === Mapping ===

    pub fn update_mapping(&mut self, schema_id: &str, csv_column: &str) -> Result<()> {
        self.require_table()?;
        self.mapping.update(schema_id, csv_column)?;
        self.discard_results();
        Ok(())
    }

    pub fn clear_mapping(&mut self, schema_id: &str) -> Result<()> {
        self.require_table()?;
        self.mapping.clear(schema_id)?;
        self.discard_results();
        Ok(())
    }

    /// Maps unmapped fields to headers with the same name. Returns how many
    /// fields were assigned.
    pub fn auto_map(&mut self) -> Result<usize> {
        self.require_table()?;
        let assigned = self.mapping.auto_map(&self.schema);
        if assigned > 0 {
            self.discard_results();
        }
        Ok(assigned)
    }

    /// Columns still selectable for a field; empty without a table.
    pub fn available_columns(&self, schema_id: &str) -> Vec<&str> {
        self.mapping.available_columns(schema_id)
    }

    pub fn is_complete(&self) -> bool {
        self.table.is_some() && self.mapping.is_complete(&self.schema)
    }

    pub fn missing_required(&self) -> Vec<&str> {
        self.mapping.missing_required(&self.schema)
    }

    pub fn summary(&self) -> MappingSummary {
        self.mapping.summary(&self.schema)
    }

    // === Preview and submission ===

    /// Materializes the preview window without storing it.
    pub fn preview(&self) -> Result<MaterializeReport> {
        self.preview_rows(DEFAULT_PREVIEW_ROWS)
    }

    /// Materializes up to `row_limit` rows without storing them. Incomplete
    /// mappings are allowed; unmapped fields are left out.
    pub fn preview_rows(&self, row_limit: usize) -> Result<MaterializeReport> {
        let table = self.require_table()?;
        Ok(materialize_with_report(
            table,
            self.mapping.mappings(),
            &self.schema,
            row_limit,
        ))
    }

    /// Materializes up to `row_limit` rows, requiring a complete mapping, and
    /// stores them as the confirmed rows.
    pub fn confirm_mapping(&mut self, row_limit: usize) -> Result<Vec<CoercionWarning>> {
        self.require_table()?;
        self.mapping.require_complete(&self.schema)?;
        let report = self.preview_rows(row_limit)?;
        self.mapped_rows = report.rows;
        tracing::info!(rows = self.mapped_rows.len(), "mapping confirmed");
        Ok(report.warnings)
    }

    /// Builds the API request: every mapping and the whole table.
    pub fn prediction_request(&self) -> Result<PredictionRequest<'_>> {
        let table = self.require_table()?;
        self.mapping.require_complete(&self.schema)?;
        Ok(PredictionRequest::new(self.mapping.mappings(), table))
    }

    /// Sends the upload to the model matching the current mode.
    ///
    /// Success or failure is recorded in [`prediction`](Self::prediction);
    /// the table and mappings stay in place for a retry.
    pub async fn submit<P: Predictor>(&mut self, predictor: &P) -> Result<PredictionResponse> {
        let model = PredictionModel::from(self.mode);
        let span = tracing::info_span!("submit", %model);

        let result = {
            let request = self.prediction_request()?;
            predictor.predict(model, &request).instrument(span).await
        };

        match result {
            Ok(response) => {
                tracing::info!(
                    %model,
                    total = response.total_predictions,
                    successful = response.successful_predictions,
                    "prediction complete"
                );
                self.prediction = PredictionState::Complete(response.clone());
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(%model, error = %e, "prediction failed");
                self.prediction = PredictionState::Failed(e.user_message().to_string());
                Err(e.into())
            }
        }
    }

    /// Confirmed rows and the last prediction describe the old mapping.
    fn discard_results(&mut self) {
        self.mapped_rows.clear();
        self.prediction = PredictionState::Idle;
    }

    fn require_table(&self) -> Result<&RawTable> {
        self.table.as_ref().ok_or(SessionError::NoActiveTable)
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_file() {
        let session = AnalysisSession::default();
        assert_eq!(session.phase(), SessionPhase::NoFile);
        assert_eq!(session.mode(), AnalysisMode::Simple);
        assert!(!session.is_complete());
        assert!(session.available_columns("time").is_empty());
    }

    #[test]
    fn tickets_are_unique() {
        let mut session = AnalysisSession::default();
        let first = session.begin_load().unwrap();
        session.cancel_load();
        let second = session.begin_load().unwrap();
        assert_ne!(first, second);
        assert!(session.is_loading());
        session.cancel_load();
        assert!(!session.is_loading());
    }
}
