//! Check command handler.
//!
//! Implements the `check` subcommand: classify an audit report against the
//! allowlist and report the verdict.

use crate::config::{CheckConfig, Validatable};
use crate::parsers::FormatResolver;
use crate::pipeline::{
    evaluate_gate, load_allowlist_with_context, output_report, parse_report_with_context,
};
use anyhow::Result;

/// Run the check command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero. Any error aborts before
/// classification.
#[allow(clippy::needless_pass_by_value)]
pub fn run_check(config: CheckConfig) -> Result<i32> {
    config.ensure_valid()?;

    let resolver = FormatResolver::new()?;
    let report = parse_report_with_context(&config.report, &resolver, config.quiet)?;
    let allowlist = load_allowlist_with_context(&config.allowlist_path, config.quiet)?;

    let run = evaluate_gate(report, allowlist, config.now, config.expiring_days);
    output_report(&config, &run)?;

    let exit_code = run.exit_code();
    if !config.quiet {
        if run.result.is_successful {
            tracing::info!("Audit gate passed");
        } else {
            tracing::warn!(
                "Audit gate failed: {} new, {} expired",
                run.result.vulnerabilities.len(),
                run.result.expired_allowlist_entries.len()
            );
        }
    }
    Ok(exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputConfig, ReportSource};
    use crate::policy::parse_expiry;
    use crate::reports::ReportFormat;
    use std::path::Path;

    const REPORT: &str = r#"{
        "advisories": {
            "1001": {"id": 1001, "module_name": "lodash", "severity": "critical", "title": "Prototype Pollution"}
        },
        "metadata": {"vulnerabilities": {"critical": 1, "total": 1}}
    }"#;

    fn config(dir: &Path, allowlist: Option<&str>) -> CheckConfig {
        let report = dir.join("audit.json");
        std::fs::write(&report, REPORT).expect("write report");
        let allowlist_path = dir.join("allow.json");
        if let Some(content) = allowlist {
            std::fs::write(&allowlist_path, content).expect("write allowlist");
        }
        CheckConfig {
            report: ReportSource::File(report),
            allowlist_path,
            now: parse_expiry("2024-01-01").expect("date"),
            expiring_days: 30,
            output: OutputConfig {
                format: ReportFormat::Json,
                file: Some(dir.join("out.json")),
                no_color: true,
            },
            quiet: true,
        }
    }

    #[test]
    fn test_new_vulnerability_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert_eq!(run_check(config(tmp.path(), None)).expect("run"), 1);
        let out = std::fs::read_to_string(tmp.path().join("out.json")).expect("output");
        assert!(out.contains("\"exitCode\": 1"));
    }

    #[test]
    fn test_allowlisted_vulnerability_passes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let allowlist =
            r#"[{"id": "1001", "package": "lodash", "reason": "no fix", "expires": "2999-01-01"}]"#;
        assert_eq!(run_check(config(tmp.path(), Some(allowlist))).expect("run"), 0);
    }

    #[test]
    fn test_malformed_allowlist_aborts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(run_check(config(tmp.path(), Some("{not json"))).is_err());
        assert!(!tmp.path().join("out.json").exists());
    }

    #[test]
    fn test_invalid_window_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut cfg = config(tmp.path(), None);
        cfg.expiring_days = 0;
        let err = run_check(cfg).expect_err("invalid window");
        assert!(matches!(
            err.downcast_ref::<crate::error::AuditGateError>(),
            Some(crate::error::AuditGateError::Validation(_))
        ));
    }
}
