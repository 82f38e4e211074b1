//! Report output stage.

use crate::config::CheckConfig;
use crate::reports::{create_reporter_with_options, ReportContext, ReportMetadata};
use anyhow::Result;

use super::{resolve_format, should_use_color, write_output, GateRun, OutputTarget};

/// Render a gate run and write it to the configured destination.
pub fn output_report(config: &CheckConfig, run: &GateRun) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let format = resolve_format(config.output.format);

    let context = ReportContext::new(run.report.severity_counts, run.evaluated_at)
        .with_metadata(ReportMetadata {
            report_path: Some(config.report.display_name()),
            allowlist_path: Some(config.allowlist_path.display().to_string()),
            ..ReportMetadata::new()
        })
        .with_unused_entries(run.unused_entries().into_iter().cloned().collect())
        .with_expiring_days(run.expiring_days);

    let reporter =
        create_reporter_with_options(format, should_use_color(config.output.no_color, &target));
    let rendered = reporter.generate(&run.result, &context)?;
    write_output(&rendered, &target, config.quiet)
}
