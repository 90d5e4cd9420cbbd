//! Qxprobe CLI entry point
//!
//! Exit status: 0 on a match (or an enabled widget), 1 otherwise or on error.

use clap::Parser;
use qxprobe_cli::{handlers, init_logging, Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    init_logging(config.verbosity);

    match &cli.command {
        Commands::Locate(args) => handlers::execute_locate(&config, args),
        Commands::Enabled(args) => handlers::execute_enabled(&config, args),
        Commands::Parse(args) => handlers::execute_parse(&config, args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let config = CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_format(cli.format.into());

    match &cli.config {
        Some(path) => config.with_qx_file(path),
        None => Ok(config),
    }
}
