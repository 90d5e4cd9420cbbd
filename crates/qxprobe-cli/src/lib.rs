//! Qxprobe CLI Library
//!
//! Command-line interface for evaluating qooxdoo widget locators against
//! widget-tree snapshots.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use commands::{Cli, ColorArg, Commands, FormatArg, LocateArgs, ParseArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::{EnabledReport, LocateReport, OutputFormat, Reporter, StepReport};
