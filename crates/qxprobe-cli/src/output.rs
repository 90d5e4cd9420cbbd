//! Output formatting

use console::{style, Term};
use serde::{Deserialize, Serialize};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Result of `qxprobe locate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateReport {
    /// The locator as given
    pub locator: String,
    /// Matched node id, for `qx` locators that resolve to a widget
    pub node: Option<String>,
    /// Matched DOM element
    pub element: Option<String>,
}

impl LocateReport {
    /// Whether anything matched
    #[must_use]
    pub const fn matched(&self) -> bool {
        self.node.is_some() || self.element.is_some()
    }
}

/// Result of `qxprobe enabled`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledReport {
    /// The locator as given
    pub locator: String,
    /// Resolved enabled state
    pub enabled: bool,
}

/// One classified step, for `qxprobe parse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step kind
    pub kind: &'static str,
    /// Step text
    pub step: String,
}

/// Writes results to stdout and diagnostics to stderr
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Result format
    pub format: OutputFormat,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false, OutputFormat::Text)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool, format: OutputFormat) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
            format,
        }
    }

    /// Render a locate result
    #[must_use]
    pub fn render_locate(&self, report: &LocateReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                if !report.matched() {
                    return self.paint_failure(&format!("{}: no match", report.locator));
                }
                let mut parts = Vec::new();
                if let Some(node) = &report.node {
                    parts.push(format!("node {node}"));
                }
                if let Some(element) = &report.element {
                    parts.push(format!("element {element}"));
                }
                self.paint_success(&format!("{}: {}", report.locator, parts.join(", ")))
            }
        }
    }

    /// Render an enabled-state result
    #[must_use]
    pub fn render_enabled(&self, report: &EnabledReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => report.enabled.to_string(),
        }
    }

    /// Render classified path steps
    #[must_use]
    pub fn render_steps(&self, steps: &[StepReport]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(steps).unwrap_or_default(),
            OutputFormat::Text => steps
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let kind = if self.use_color {
                        style(s.kind).cyan().to_string()
                    } else {
                        s.kind.to_string()
                    };
                    format!("{i:>2}  {kind:<10} {}", s.step)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Print a result line (always printed, even in quiet mode)
    pub fn result(&self, text: &str) {
        let _ = self.out.write_line(text);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "ERROR".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    fn paint_success(&self, text: &str) -> String {
        if self.use_color {
            format!("{} {text}", style("✓").green().bold())
        } else {
            text.to_string()
        }
    }

    fn paint_failure(&self, text: &str) -> String {
        if self.use_color {
            format!("{} {text}", style("✗").red().bold())
        } else {
            text.to_string()
        }
    }
}
