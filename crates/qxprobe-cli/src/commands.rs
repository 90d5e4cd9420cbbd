//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Qxprobe: evaluate qooxdoo widget locators against widget-tree snapshots
#[derive(Parser, Debug)]
#[command(name = "qxprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Result format
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Locator settings file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the element a locator designates in a snapshot
    Locate(LocateArgs),

    /// Report whether the widget a `qx` locator designates is enabled
    Enabled(LocateArgs),

    /// Parse a hierarchy path and print its classified steps
    Parse(ParseArgs),
}

/// Arguments shared by `locate` and `enabled`
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Widget-tree snapshot (YAML or JSON)
    pub snapshot: PathBuf,

    /// Locator, e.g. `qxh=app:toolbar/child[0]` or `qx=toolbar/quit`
    pub locator: String,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Hierarchy path, without the `qxh=` prefix
    pub path: String,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Result format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
