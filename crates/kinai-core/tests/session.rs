use std::future::Future;
use std::sync::Mutex;

use kinai_core::{AnalysisSession, PredictionState, SessionError, SessionPhase};
use kinai_ingest::IngestError;
use kinai_map::MappingError;
use kinai_model::{AnalysisMode, CellValue, DataType, SchemaField, SchemaRegistry};
use kinai_predict::{
    PredictError, PredictionModel, PredictionRequest, PredictionResponse, Predictor,
};

const LIGHT_CURVE: &str = "TIME,FLUX,FLUX_ERR,QUALITY\n\
                           131.51,0.9991,0.0004,0\n\
                           131.53,abc,0.0004,0\n";

/// Predictor that records requests and replies from a script.
struct FakePredictor {
    fail_with: Option<(u16, &'static str)>,
    calls: Mutex<Vec<(PredictionModel, serde_json::Value)>>,
}

impl FakePredictor {
    fn succeeding() -> Self {
        Self {
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16, message: &'static str) -> Self {
        Self {
            fail_with: Some((status, message)),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(PredictionModel, serde_json::Value)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Predictor for FakePredictor {
    fn predict(
        &self,
        model: PredictionModel,
        request: &PredictionRequest<'_>,
    ) -> impl Future<Output = kinai_predict::Result<PredictionResponse>> + Send {
        let payload = serde_json::to_value(request).expect("serialize request");
        let rows = request.csv_data.total_rows() as u64;
        self.calls.lock().expect("calls lock").push((model, payload));
        let fail_with = self.fail_with;

        async move {
            match fail_with {
                Some((status, message)) => Err(PredictError::Status {
                    status,
                    message: message.to_string(),
                }),
                None => Ok(PredictionResponse {
                    predictions: vec![Some(0.5); rows as usize],
                    total_predictions: rows,
                    successful_predictions: rows,
                    ..PredictionResponse::default()
                }),
            }
        }
    }
}

fn mapped_light_curve_session() -> AnalysisSession {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    session.load_text(LIGHT_CURVE).expect("load csv");
    session.update_mapping("time", "TIME").unwrap();
    session.update_mapping("flux", "FLUX").unwrap();
    session.update_mapping("flux_error", "FLUX_ERR").unwrap();
    session.update_mapping("quality_flag", "QUALITY").unwrap();
    session
}

#[test]
fn phases_follow_the_workflow() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    assert_eq!(session.phase(), SessionPhase::NoFile);

    session.load_text(LIGHT_CURVE).expect("load csv");
    assert_eq!(session.phase(), SessionPhase::MappingIncomplete);
    assert!(!session.is_complete());
    assert_eq!(session.summary().required_mapped, 0);

    let session = mapped_light_curve_session();
    assert_eq!(session.phase(), SessionPhase::MappingComplete);
    assert!(session.missing_required().is_empty());
}

#[test]
fn mapping_without_table_is_rejected() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    assert!(matches!(
        session.update_mapping("time", "TIME"),
        Err(SessionError::NoActiveTable)
    ));
    assert!(matches!(session.auto_map(), Err(SessionError::NoActiveTable)));
    assert!(matches!(session.preview(), Err(SessionError::NoActiveTable)));
    assert!(session.mapping().is_empty());
}

#[test]
fn removing_file_clears_mappings() {
    let mut session = mapped_light_curve_session();
    session.confirm_mapping(100).expect("confirm");
    assert_eq!(session.mapped_rows().len(), 2);

    session.remove_file();

    assert_eq!(session.phase(), SessionPhase::NoFile);
    assert!(session.mapping().is_empty());
    assert!(session.mapped_rows().is_empty());
    assert!(!session.is_complete());
}

#[test]
fn parse_failure_resets_session() {
    let mut session = mapped_light_curve_session();

    let err = session.load_text("\n  \n").unwrap_err();

    assert!(matches!(err, SessionError::Parse(IngestError::EmptyInput)));
    assert_eq!(session.phase(), SessionPhase::NoFile);
    assert!(session.table().is_none());
    assert!(session.mapping().is_empty());
}

#[test]
fn new_upload_reinitializes_mappings() {
    let mut session = mapped_light_curve_session();
    session.load_text("time,flux\n1,2\n").expect("load second csv");
    assert_eq!(session.summary().mapped, 0);
    assert_eq!(session.available_columns("time"), vec!["time", "flux"]);
}

#[test]
fn load_guard_rejects_concurrent_and_stale_loads() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);

    let ticket = session.begin_load().expect("first load");
    assert!(matches!(
        session.begin_load(),
        Err(SessionError::LoadInProgress)
    ));
    assert!(matches!(
        session.load_text(LIGHT_CURVE),
        Err(SessionError::LoadInProgress)
    ));

    session.cancel_load();
    let current = session.begin_load().expect("second load");
    assert!(matches!(
        session.finish_load(ticket, LIGHT_CURVE),
        Err(SessionError::StaleLoad(_))
    ));
    assert!(session.is_loading());

    let table = session.finish_load(current, "a,b\n1,2\n").expect("finish");
    assert_eq!(table.headers(), ["a", "b"]);
    assert!(!session.is_loading());
}

#[test]
fn removing_file_invalidates_pending_load() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    let ticket = session.begin_load().expect("load");
    session.remove_file();
    assert!(matches!(
        session.finish_load(ticket, LIGHT_CURVE),
        Err(SessionError::StaleLoad(_))
    ));
    assert_eq!(session.phase(), SessionPhase::NoFile);
}

#[test]
fn mode_change_swaps_registry_and_resets() {
    let mut session = mapped_light_curve_session();
    session.set_mode(AnalysisMode::Complex);

    assert_eq!(session.schema().name(), "extended");
    assert_eq!(session.phase(), SessionPhase::NoFile);

    session
        .load_text("kepid,ror\nK1,0.02\n")
        .expect("load extended csv");
    assert_eq!(session.mapping().mappings().len(), 8);
    assert_eq!(session.missing_required().len(), 8);
}

#[test]
fn duplicate_column_assignment_is_rejected() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    session.load_text(LIGHT_CURVE).expect("load csv");
    session.update_mapping("time", "TIME").unwrap();

    let err = session.update_mapping("flux", "TIME").unwrap_err();

    assert!(matches!(
        err,
        SessionError::Mapping(MappingError::ColumnAlreadyMapped { .. })
    ));
    assert!(!session.available_columns("flux").contains(&"TIME"));
}

#[test]
fn confirm_requires_complete_mapping() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    session.load_text(LIGHT_CURVE).expect("load csv");
    session.update_mapping("time", "TIME").unwrap();

    let err = session.confirm_mapping(10).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Mapping(MappingError::IncompleteMapping { .. })
    ));

    let preview = session.preview().expect("preview");
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.rows[0].len(), 1);
}

#[test]
fn confirm_reports_fallbacks() {
    let mut session = mapped_light_curve_session();

    let warnings = session.confirm_mapping(10).expect("confirm");

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].row, 1);
    assert_eq!(warnings[0].schema_id, "flux");
    assert_eq!(
        session.mapped_rows()[1].get("flux"),
        Some(&CellValue::Number(0.0))
    );

    session.update_mapping("flux", "").unwrap();
    assert!(session.mapped_rows().is_empty());
}

#[test]
fn auto_map_uses_header_names() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    session
        .load_text("Time,Flux,flux_error,quality_flag\n1,2,3,0\n")
        .expect("load csv");
    assert_eq!(session.auto_map().expect("auto map"), 4);
    assert_eq!(session.phase(), SessionPhase::MappingComplete);
}

#[test]
fn custom_registry_drives_completeness() {
    let schema = SchemaRegistry::new(
        "transit",
        vec![
            SchemaField::new("period", "Orbital period", DataType::Number).required(),
            SchemaField::new("observed", "Observed", DataType::Date),
        ],
    )
    .expect("registry");
    let mut session = AnalysisSession::with_schema(AnalysisMode::Simple, schema);
    session
        .load_text("P,obs\n3.52,2024-01-15\n")
        .expect("load csv");
    session.update_mapping("period", "P").unwrap();
    session.update_mapping("observed", "obs").unwrap();

    let preview = session.preview().expect("preview");
    assert!(matches!(
        preview.rows[0].get("observed"),
        Some(CellValue::Date(Some(_)))
    ));
    assert!(session.is_complete());
}

#[test]
fn request_needs_complete_mapping() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    assert!(matches!(
        session.prediction_request(),
        Err(SessionError::NoActiveTable)
    ));

    session.load_text(LIGHT_CURVE).expect("load csv");
    assert!(matches!(
        session.prediction_request(),
        Err(SessionError::Mapping(MappingError::IncompleteMapping { .. }))
    ));
}

#[tokio::test]
async fn submit_sends_every_mapping_and_full_table() {
    let mut session = mapped_light_curve_session();
    let predictor = FakePredictor::succeeding();

    let response = session.submit(&predictor).await.expect("submit");

    assert_eq!(response.total_predictions, 2);
    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert_eq!(session.prediction().response(), Some(&response));

    let calls = predictor.calls();
    assert_eq!(calls.len(), 1);
    let (model, payload) = &calls[0];
    assert_eq!(*model, PredictionModel::Fast);
    assert_eq!(payload["mappings"].as_array().map(Vec::len), Some(4));
    assert_eq!(payload["mappings"][1]["csvColumn"], "FLUX");
    assert_eq!(payload["csvData"]["totalRows"], 2);
    assert_eq!(payload["csvData"]["rows"][1][1], "abc");
}

#[tokio::test]
async fn complex_mode_uses_deep_model() {
    let mut session = AnalysisSession::new(AnalysisMode::Complex);
    session
        .load_text(
            "search_id,num_planet,disposition,ror,stellar_mass,ss_gravity,global_view,local_view\n\
             K1,1,1,0.02,1.0,4.4,\"[0.1]\",\"[0.2]\"\n",
        )
        .expect("load csv");
    assert_eq!(session.auto_map().expect("auto map"), 8);

    let predictor = FakePredictor::succeeding();
    session.submit(&predictor).await.expect("submit");

    assert_eq!(predictor.calls()[0].0, PredictionModel::Deep);
}

#[tokio::test]
async fn failed_submit_keeps_table_and_mapping() {
    let mut session = mapped_light_curve_session();
    let predictor = FakePredictor::failing(500, "model not loaded");

    let err = session.submit(&predictor).await.unwrap_err();

    assert!(matches!(err, SessionError::Remote(_)));
    assert_eq!(err.user_message(), "model not loaded");
    assert_eq!(
        session.prediction(),
        &PredictionState::Failed("model not loaded".to_string())
    );
    assert!(session.table().is_some());
    assert!(session.mapping().is_complete(session.schema()));

    let retry = FakePredictor::succeeding();
    session.submit(&retry).await.expect("retry");
    assert!(session.prediction().response().is_some());
}

#[tokio::test]
async fn incomplete_mapping_sends_nothing() {
    let mut session = AnalysisSession::new(AnalysisMode::Simple);
    session.load_text(LIGHT_CURVE).expect("load csv");
    let predictor = FakePredictor::succeeding();

    let err = session.submit(&predictor).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Mapping(MappingError::IncompleteMapping { .. })
    ));
    assert!(predictor.calls().is_empty());
    assert_eq!(session.prediction(), &PredictionState::Idle);
}

#[tokio::test]
async fn editing_after_submit_returns_to_mapping() {
    let mut session = mapped_light_curve_session();
    session
        .submit(&FakePredictor::succeeding())
        .await
        .expect("submit");
    assert_eq!(session.phase(), SessionPhase::Submitted);

    session.update_mapping("time", "").unwrap();

    assert_eq!(session.phase(), SessionPhase::MappingIncomplete);
    assert_eq!(session.prediction(), &PredictionState::Idle);

    session.update_mapping("time", "TIME").unwrap();
    assert_eq!(session.phase(), SessionPhase::MappingComplete);
}

#[tokio::test]
async fn rejected_edit_keeps_prediction() {
    let mut session = mapped_light_curve_session();
    session
        .submit(&FakePredictor::succeeding())
        .await
        .expect("submit");

    assert!(session.update_mapping("flux", "TIME").is_err());

    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert!(session.prediction().response().is_some());
}
