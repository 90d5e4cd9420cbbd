//! `locate` and `enabled` command handlers

use crate::commands::LocateArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{EnabledReport, LocateReport, Reporter};
use qxprobe::{is_qx_enabled, Dispatcher, Locator, QxLocator, WidgetSnapshot};
use tracing::info;

/// Evaluate a locator against a loaded snapshot.
pub fn locate_report(
    snapshot: &WidgetSnapshot,
    config: &CliConfig,
    locator: &str,
) -> CliResult<LocateReport> {
    let dispatcher = Dispatcher::new(snapshot).with_config(config.qx.clone());
    let node = match Locator::parse(locator)? {
        Locator::Qx(QxLocator::TagXPath { .. }) | Locator::Native(_) => None,
        Locator::Qx(qx) => dispatcher
            .locate_object(&qx)?
            .map(|id| snapshot.id_of(id).to_string()),
    };
    let element = dispatcher.find_element(locator)?;
    Ok(LocateReport {
        locator: locator.to_string(),
        node,
        element,
    })
}

/// Enabled state of the widget a locator designates.
pub fn enabled_report(
    snapshot: &WidgetSnapshot,
    config: &CliConfig,
    locator: &str,
) -> CliResult<EnabledReport> {
    let dispatcher = Dispatcher::new(snapshot).with_config(config.qx.clone());
    Ok(EnabledReport {
        locator: locator.to_string(),
        enabled: is_qx_enabled(&dispatcher, locator)?,
    })
}

/// Execute the locate command; `Ok(false)` when nothing matched.
pub fn execute_locate(config: &CliConfig, args: &LocateArgs) -> CliResult<bool> {
    let snapshot = WidgetSnapshot::load(&args.snapshot)?;
    info!(%snapshot, locator = %args.locator, "Locating");
    let report = locate_report(&snapshot, config, &args.locator)?;
    let reporter = reporter_for(config);
    reporter.result(&reporter.render_locate(&report));
    Ok(report.matched())
}

/// Execute the enabled command; `Ok(false)` when the widget is disabled.
pub fn execute_enabled(config: &CliConfig, args: &LocateArgs) -> CliResult<bool> {
    let snapshot = WidgetSnapshot::load(&args.snapshot)?;
    info!(%snapshot, locator = %args.locator, "Checking enabled state");
    let report = enabled_report(&snapshot, config, &args.locator)?;
    let reporter = reporter_for(config);
    reporter.result(&reporter.render_enabled(&report));
    Ok(report.enabled)
}

pub(crate) fn reporter_for(config: &CliConfig) -> Reporter {
    Reporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
        config.format,
    )
}
