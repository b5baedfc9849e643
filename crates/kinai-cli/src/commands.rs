use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use kinai_cli::mapping::{MappingFile, apply_mappings};
use kinai_core::AnalysisSession;
use kinai_ingest::{read_csv_file, read_csv_text};
use kinai_model::{AnalysisMode, SchemaRegistry};
use kinai_predict::{ApiConfig, PredictionClient, PredictionResponse};

use crate::cli::{ApiArgs, InspectArgs, MappingArgs, PredictArgs, PreviewArgs, SchemaArgs};
use crate::summary::{
    apply_table_style, header_cell, print_mapping, print_mapping_summary, print_prediction,
    print_rows, print_schema, print_warnings,
};

pub fn run_schemas(args: &SchemaArgs) -> Result<()> {
    let (_, schema) = load_schema(args)?;
    print_schema(&schema);
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let table = read_csv_file(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    println!("File: {}", args.file.display());
    println!("Rows: {}", table.total_rows());

    let mut out = comfy_table::Table::new();
    out.set_header(vec![header_cell("#"), header_cell("Column"), header_cell("First value")]);
    apply_table_style(&mut out);
    for (index, header) in table.headers().iter().enumerate() {
        let first = table.cell(0, index).unwrap_or_default();
        out.add_row(vec![(index + 1).to_string(), header.clone(), first.to_string()]);
    }
    println!("{out}");
    Ok(())
}

/// Builds the session, applies mappings and prints the preview window.
///
/// Returns `false` when required fields are still unmapped.
pub fn run_preview(args: &PreviewArgs) -> Result<bool> {
    let session = build_session(&args.mapping)?;
    let report = session.preview_rows(args.rows)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report.rows).context("serialize preview")?;
        println!("{json}");
    } else {
        print_mapping(session.schema(), session.mapping());
        print_mapping_summary(&session.summary());
        print_rows(session.schema(), &report.rows);
    }
    print_warnings(&report.warnings);

    let missing = session.missing_required();
    if missing.is_empty() {
        Ok(true)
    } else {
        warn!(missing = ?missing, "required fields are not mapped");
        eprintln!("missing required fields: {}", missing.join(", "));
        Ok(false)
    }
}

/// Sends the mapped upload to the prediction API matching the mode.
pub fn run_predict(args: &PredictArgs) -> Result<PredictionResponse> {
    let mut session = build_session(&args.mapping)?;
    // Fail before touching the network when the mapping is incomplete.
    if let Err(e) = session.prediction_request() {
        let missing = session.missing_required();
        if missing.is_empty() {
            bail!("{}", e.user_message());
        }
        bail!("missing required fields: {}", missing.join(", "));
    }

    let client = PredictionClient::new(api_config(&args.api)?).context("build API client")?;
    info!(
        mode = %session.mode(),
        url = %client.config().base_url,
        rows = session.table().map_or(0, |table| table.total_rows()),
        "sending prediction request"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let response = runtime
        .block_on(session.submit(&client))
        .context("prediction failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&response).context("serialize response")?;
        println!("{json}");
        for error in response.errors.iter().flatten() {
            eprintln!("api: {error}");
        }
    } else {
        print_prediction(&response);
    }
    Ok(response)
}

/// Returns whether the API answered below 500.
pub fn run_health(args: &ApiArgs) -> Result<bool> {
    let client = PredictionClient::new(api_config(args)?).context("build API client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let healthy = runtime.block_on(client.health_check());
    if healthy {
        println!("{} is reachable", client.config().base_url);
    } else {
        println!("{} is not reachable", client.config().base_url);
    }
    Ok(healthy)
}

fn load_schema(args: &SchemaArgs) -> Result<(AnalysisMode, SchemaRegistry)> {
    let mode = AnalysisMode::from(args.mode);
    let Some(path) = &args.schema_file else {
        return Ok((mode, mode.registry()));
    };
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("custom");
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read schema file {}", path.display()))?;
    let schema = SchemaRegistry::from_json(name, &json)
        .with_context(|| format!("load schema file {}", path.display()))?;
    debug!(registry = schema.name(), fields = schema.len(), "loaded custom registry");
    Ok((mode, schema))
}

fn build_session(args: &MappingArgs) -> Result<AnalysisSession> {
    let span = info_span!("session", file = %args.file.display());
    let _guard = span.enter();

    let (mode, schema) = load_schema(&args.schema)?;
    let mut session = AnalysisSession::with_schema(mode, schema);

    let ticket = session.begin_load()?;
    let text = match read_csv_text(&args.file) {
        Ok(text) => text,
        Err(e) => {
            session.cancel_load();
            return Err(anyhow::Error::new(e).context(format!("read {}", args.file.display())));
        }
    };
    session
        .finish_load(ticket, &text)
        .with_context(|| format!("parse {}", args.file.display()))?;

    let file_mappings = match &args.mapping_file {
        Some(path) => MappingFile::load(path)?,
        None => MappingFile::default(),
    };
    let assignments = file_mappings.entries().chain(
        args.map
            .iter()
            .map(|(field, column)| (field.as_str(), column.as_str())),
    );
    let auto = apply_mappings(&mut session, assignments, args.auto)?;
    if auto > 0 {
        info!(auto, "auto-mapped fields by header name");
    }
    Ok(session)
}

fn api_config(args: &ApiArgs) -> Result<ApiConfig> {
    let config = match &args.config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::default(),
    };
    let config = config.with_env_overrides();
    Ok(match &args.api_url {
        Some(url) => config.with_base_url(url.as_str()),
        None => config,
    })
}
