//! Classification stage.

use crate::model::{AllowlistEntry, AnalysisResult, CanonicalReport};
use crate::policy::{unused_entries, Classifier};
use chrono::{DateTime, Utc};

/// Inputs and output of one classification.
#[derive(Debug, Clone)]
pub struct GateRun {
    pub report: CanonicalReport,
    pub allowlist: Vec<AllowlistEntry>,
    pub result: AnalysisResult,
    pub evaluated_at: DateTime<Utc>,
    pub expiring_days: i64,
}

impl GateRun {
    /// Allowlist entries matching no high or critical vulnerability.
    #[must_use]
    pub fn unused_entries(&self) -> Vec<&AllowlistEntry> {
        unused_entries(&self.report, &self.allowlist)
    }

    /// Exit status for this run.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        super::exit_code(&self.result)
    }
}

/// Classify `report` against `allowlist` at `now`.
#[must_use]
pub fn evaluate_gate(
    report: CanonicalReport,
    allowlist: Vec<AllowlistEntry>,
    now: DateTime<Utc>,
    expiring_days: i64,
) -> GateRun {
    let result = Classifier::new(expiring_days).classify(&report, &allowlist, now);

    tracing::info!(
        "Classified {} high/critical vulnerabilities: {} new, {} allowed, {} expired, {} expiring",
        result.classified_count(),
        result.vulnerabilities.len(),
        result.allowed_vulnerabilities.len(),
        result.expired_allowlist_entries.len(),
        result.expiring_entries.len()
    );
    if report.vulnerabilities.is_empty() && report.severity_counts.gating() > 0 {
        tracing::warn!(
            "Report lists {} high/critical findings in its summary but no vulnerability details; \
             the gate cannot classify them",
            report.severity_counts.gating()
        );
    }

    GateRun {
        report,
        allowlist,
        result,
        evaluated_at: now,
        expiring_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalVulnerability, Severity, SeverityCounts, SourceFormat};
    use crate::policy::parse_expiry;

    #[test]
    fn test_evaluate_gate() {
        let report = CanonicalReport::new(
            vec![CanonicalVulnerability {
                id: "1001".to_string(),
                package: "lodash".to_string(),
                severity: Severity::Critical,
                title: "Prototype Pollution".to_string(),
                url: String::new(),
                vulnerable_versions: "*".to_string(),
                source_format: SourceFormat::Legacy,
            }],
            SeverityCounts::default(),
        );
        let allowlist = vec![
            AllowlistEntry::new("1001", "lodash", "no fix").with_expires("2999-01-01"),
            AllowlistEntry::new("42", "left-pad", "stale").with_expires("2999-01-01"),
        ];
        let run = evaluate_gate(report, allowlist, parse_expiry("2024-01-01").expect("date"), 30);

        assert!(run.result.is_successful);
        assert_eq!(run.exit_code(), 0);
        let unused: Vec<_> = run.unused_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(unused, vec!["42"]);
    }
}
