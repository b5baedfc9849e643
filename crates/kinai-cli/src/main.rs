//! `kinai`: map exoplanet CSV uploads and request predictions.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use kinai_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_health, run_inspect, run_predict, run_preview, run_schemas};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let outcome = match &cli.command {
        Command::Schemas(args) => run_schemas(args).map(|()| true),
        Command::Inspect(args) => run_inspect(args).map(|()| true),
        Command::Preview(args) => run_preview(args),
        Command::Predict(args) => run_predict(args).map(|_| true),
        Command::Health(args) => run_health(args),
    };
    let code = match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(code);
}

/// `--log-level` beats `-v`/`-q`; either one beats `RUST_LOG`.
fn log_config(cli: &Cli) -> LogConfig {
    let base = LogConfig::default();
    let base = match cli.log_level {
        Some(level) => base.with_explicit_level(level.into()),
        None if cli.verbosity.is_present() => {
            base.with_explicit_level(cli.verbosity.tracing_level_filter())
        }
        None => base.with_level(cli.verbosity.tracing_level_filter()),
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    base.with_format(cli.log_format.into())
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone())
}
