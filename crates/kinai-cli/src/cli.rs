//! CLI argument definitions for the KINAI host.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use kinai_model::AnalysisMode;
use tracing::level_filters::LevelFilter;

use kinai_cli::logging::LogFormat;
use kinai_cli::mapping::parse_assignment;

#[derive(Parser)]
#[command(
    name = "kinai",
    version,
    about = "KINAI Exoplanets - map CSV columns and request exoplanet predictions",
    long_about = "Map the columns of an uploaded CSV onto the light-curve or extended\n\
                  schema, preview the converted rows, and send the data to the KINAI\n\
                  prediction API (fast or deep model)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the fields of the active schema registry.
    Schemas(SchemaArgs),

    /// Show the headers and row count of a CSV file.
    Inspect(InspectArgs),

    /// Apply mappings and preview the converted rows.
    Preview(PreviewArgs),

    /// Apply mappings and send the data to the prediction API.
    Predict(PredictArgs),

    /// Check whether the prediction API is reachable.
    Health(ApiArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Analysis mode; selects the built-in registry.
    #[arg(long = "mode", value_enum, default_value = "simple")]
    pub mode: ModeArg,

    /// Load the registry from a JSON file instead of the built-in one.
    #[arg(long = "schema-file", value_name = "PATH")]
    pub schema_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// CSV file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct MappingArgs {
    /// CSV file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Map a schema field to a CSV column (repeatable).
    #[arg(long = "map", value_name = "FIELD=COLUMN", value_parser = parse_assignment)]
    pub map: Vec<(String, String)>,

    /// TOML file with a [mappings] table of field = "column" entries.
    #[arg(long = "mapping-file", value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Map remaining fields to headers with the same name.
    #[arg(long = "auto")]
    pub auto: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Number of rows to preview.
    #[arg(long = "rows", value_name = "N", default_value_t = kinai_transform::DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Print rows as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Print the API response as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ApiArgs {
    /// API configuration file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the prediction API (overrides config and KINAI_API_URL).
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,
}

/// CLI analysis mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Light-curve columns, fast model.
    Simple,
    /// Transit and stellar parameters, deep model.
    Complex,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => AnalysisMode::Simple,
            ModeArg::Complex => AnalysisMode::Complex,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
