//! `parse` command handler

use crate::commands::ParseArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::handlers::locate::reporter_for;
use crate::output::StepReport;
use qxprobe::{Path, PathStep};

/// Classify every step of a hierarchy path.
pub fn classify_steps(path: &Path) -> Vec<StepReport> {
    path.steps()
        .iter()
        .map(|step| StepReport {
            kind: step_kind(step),
            step: step.to_string(),
        })
        .collect()
}

fn step_kind(step: &PathStep) -> &'static str {
    match step {
        PathStep::Wildcard => "wildcard",
        PathStep::Name(_) if step.is_class_name() => "class",
        PathStep::Name(_) => "member",
        PathStep::Index(_) => "index",
        PathStep::Attribute(attribute) => match attribute.predicate() {
            None => "never",
            Some(predicate) if predicate.pattern().is_some() => "attribute",
            Some(_) => "deref",
        },
    }
}

/// Execute the parse command.
pub fn execute_parse(config: &CliConfig, args: &ParseArgs) -> CliResult<bool> {
    let path = Path::parse(&args.path)?;
    let reporter = reporter_for(config);
    reporter.result(&reporter.render_steps(&classify_steps(&path)));
    Ok(true)
}
