//! Classification of canonical vulnerabilities against the allowlist.

use super::temporal::{is_expired, will_expire_soon, DEFAULT_EXPIRING_DAYS};
use crate::model::{
    AllowlistEntry, AllowlistStatus, AnalysisResult, CanonicalReport, VulnerabilityInfo,
};
use chrono::{DateTime, Utc};

/// Joins a canonical report with the allowlist.
///
/// Only findings at or above the severity floor are classified. Each lands in
/// exactly one of the new, allowed or expired buckets; allowed findings whose
/// entry lapses within `expiring_days` are also listed as expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    expiring_days: i64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRING_DAYS)
    }
}

impl Classifier {
    #[must_use]
    pub const fn new(expiring_days: i64) -> Self {
        Self { expiring_days }
    }

    #[must_use]
    pub const fn expiring_days(&self) -> i64 {
        self.expiring_days
    }

    /// Classify `report` at time `now`.
    ///
    /// Pure: identical inputs give identical results. Report order is kept
    /// within every bucket. When several entries share a key the first one
    /// wins, although the allowlist loader rejects such documents.
    #[must_use]
    pub fn classify(
        &self,
        report: &CanonicalReport,
        allowlist: &[AllowlistEntry],
        now: DateTime<Utc>,
    ) -> AnalysisResult {
        let mut new = Vec::new();
        let mut allowed = Vec::new();
        let mut expired = Vec::new();
        let mut expiring = Vec::new();

        for vulnerability in report.gating_vulnerabilities() {
            let entry = allowlist
                .iter()
                .find(|e| e.matches(&vulnerability.id, &vulnerability.package));

            match entry {
                None => {
                    tracing::debug!(
                        "New {} vulnerability {} in {}",
                        vulnerability.severity,
                        vulnerability.id,
                        vulnerability.package
                    );
                    new.push(VulnerabilityInfo::new_finding(vulnerability));
                }
                Some(entry) if is_expired(entry.expires.as_deref(), now) => {
                    tracing::debug!(
                        "Allowlist entry for {} in {} has expired",
                        vulnerability.id,
                        vulnerability.package
                    );
                    expired.push(VulnerabilityInfo::with_entry(
                        vulnerability,
                        entry,
                        AllowlistStatus::Expired,
                    ));
                }
                Some(entry) => {
                    let info =
                        VulnerabilityInfo::with_entry(vulnerability, entry, AllowlistStatus::Allowed);
                    if will_expire_soon(entry.expires.as_deref(), now, self.expiring_days) {
                        tracing::debug!(
                            "Allowlist entry for {} in {} expires soon",
                            vulnerability.id,
                            vulnerability.package
                        );
                        expiring.push(info.clone());
                    }
                    allowed.push(info);
                }
            }
        }

        AnalysisResult::from_buckets(new, allowed, expired, expiring)
    }
}

/// Classify with the default expiring window.
#[must_use]
pub fn classify(
    report: &CanonicalReport,
    allowlist: &[AllowlistEntry],
    now: DateTime<Utc>,
) -> AnalysisResult {
    Classifier::default().classify(report, allowlist, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalVulnerability, Severity, SeverityCounts, SourceFormat};
    use crate::policy::temporal::parse_expiry;

    fn vuln(id: &str, package: &str, severity: Severity) -> CanonicalVulnerability {
        CanonicalVulnerability {
            id: id.to_string(),
            package: package.to_string(),
            severity,
            title: "Prototype Pollution".to_string(),
            url: "https://github.com/advisories/GHSA-test".to_string(),
            vulnerable_versions: "<4.17.21".to_string(),
            source_format: SourceFormat::Legacy,
        }
    }

    fn report(vulns: Vec<CanonicalVulnerability>) -> CanonicalReport {
        CanonicalReport::new(vulns, SeverityCounts::default())
    }

    fn now() -> DateTime<Utc> {
        parse_expiry("2024-01-01").expect("date")
    }

    #[test]
    fn test_unlisted_critical_is_new() {
        let result = classify(&report(vec![vuln("1001", "lodash", Severity::Critical)]), &[], now());
        assert_eq!(result.vulnerabilities.len(), 1);
        assert_eq!(result.vulnerabilities[0].allowlist_status, AllowlistStatus::New);
        assert!(!result.is_successful);
    }

    #[test]
    fn test_valid_entry_allows() {
        let allowlist =
            vec![AllowlistEntry::new("1001", "lodash", "no fix").with_expires("2999-01-01")];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::Critical)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.allowed_vulnerabilities.len(), 1);
        assert_eq!(result.allowed_vulnerabilities[0].reason.as_deref(), Some("no fix"));
        assert!(result.expiring_entries.is_empty());
        assert!(result.is_successful);
    }

    #[test]
    fn test_expired_entry_fails_gate() {
        let allowlist =
            vec![AllowlistEntry::new("1001", "lodash", "no fix").with_expires("2020-01-01")];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::High)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.expired_allowlist_entries.len(), 1);
        let item = &result.expired_allowlist_entries[0];
        assert_eq!(item.allowlist_status, AllowlistStatus::Expired);
        assert_eq!(item.expires_on.as_deref(), Some("2020-01-01"));
        assert!(!result.is_successful);
    }

    #[test]
    fn test_entry_without_expiry_is_expired() {
        let allowlist = vec![AllowlistEntry::new("1001", "lodash", "no fix")];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::High)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.expired_allowlist_entries.len(), 1);
    }

    #[test]
    fn test_expiring_entry_in_both_buckets() {
        let allowlist =
            vec![AllowlistEntry::new("1001", "lodash", "no fix").with_expires("2024-01-11")];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::Critical)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.allowed_vulnerabilities.len(), 1);
        assert_eq!(result.expiring_entries, result.allowed_vulnerabilities);
        assert!(result.is_successful);
    }

    #[test]
    fn test_custom_window() {
        let allowlist =
            vec![AllowlistEntry::new("1001", "lodash", "no fix").with_expires("2024-01-11")];
        let result = Classifier::new(5).classify(
            &report(vec![vuln("1001", "lodash", Severity::Critical)]),
            &allowlist,
            now(),
        );
        assert!(result.expiring_entries.is_empty());
        assert_eq!(result.allowed_vulnerabilities.len(), 1);
    }

    #[test]
    fn test_below_floor_ignored() {
        let result = classify(
            &report(vec![
                vuln("1", "a", Severity::Info),
                vuln("2", "b", Severity::Low),
                vuln("3", "c", Severity::Moderate),
            ]),
            &[],
            now(),
        );
        assert_eq!(result.classified_count(), 0);
        assert!(result.is_successful);
    }

    #[test]
    fn test_match_requires_package() {
        let allowlist =
            vec![AllowlistEntry::new("1001", "underscore", "no fix").with_expires("2999-01-01")];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::Critical)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.vulnerabilities.len(), 1);
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let allowlist = vec![
            AllowlistEntry::new("1001", "lodash", "first").with_expires("2020-01-01"),
            AllowlistEntry::new("1001", "lodash", "second").with_expires("2999-01-01"),
        ];
        let result = classify(
            &report(vec![vuln("1001", "lodash", Severity::Critical)]),
            &allowlist,
            now(),
        );
        assert_eq!(result.expired_allowlist_entries.len(), 1);
        assert_eq!(result.expired_allowlist_entries[0].reason.as_deref(), Some("first"));
    }

    #[test]
    fn test_report_order_preserved() {
        let result = classify(
            &report(vec![
                vuln("3", "c", Severity::High),
                vuln("1", "a", Severity::Critical),
                vuln("2", "b", Severity::High),
            ]),
            &[],
            now(),
        );
        let ids: Vec<_> = result.vulnerabilities.iter().map(VulnerabilityInfo::id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let r = report(vec![
            vuln("1", "a", Severity::High),
            vuln("2", "b", Severity::Critical),
        ]);
        let allowlist = vec![AllowlistEntry::new("2", "b", "x").with_expires("2024-01-20")];
        assert_eq!(classify(&r, &allowlist, now()), classify(&r, &allowlist, now()));
    }
}
