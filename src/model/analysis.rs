//! Classification output.

use super::{AllowlistEntry, CanonicalVulnerability};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a vulnerability relates to the allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AllowlistStatus {
    /// Not on the allowlist
    New,
    /// On the allowlist, but the acceptance has lapsed
    Expired,
    /// On the allowlist and still valid
    Allowed,
}

impl fmt::Display for AllowlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Expired => write!(f, "expired"),
            Self::Allowed => write!(f, "allowed"),
        }
    }
}

/// A canonical vulnerability joined with its allowlist status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityInfo {
    #[serde(flatten)]
    pub vulnerability: CanonicalVulnerability,
    pub allowlist_status: AllowlistStatus,
    /// Justification copied from the matching allowlist entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Expiration copied from the matching allowlist entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
}

impl VulnerabilityInfo {
    /// A vulnerability with no allowlist entry.
    #[must_use]
    pub fn new_finding(vulnerability: &CanonicalVulnerability) -> Self {
        Self {
            vulnerability: vulnerability.clone(),
            allowlist_status: AllowlistStatus::New,
            reason: None,
            expires_on: None,
        }
    }

    /// A vulnerability covered by `entry` with the given status.
    #[must_use]
    pub fn with_entry(
        vulnerability: &CanonicalVulnerability,
        entry: &AllowlistEntry,
        status: AllowlistStatus,
    ) -> Self {
        Self {
            vulnerability: vulnerability.clone(),
            allowlist_status: status,
            reason: Some(entry.reason.clone()),
            expires_on: entry.expires.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.vulnerability.id
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.vulnerability.package
    }
}

/// Terminal value of an analysis run.
///
/// `is_successful` is derived from the buckets and always equals
/// `vulnerabilities.is_empty() && expired_allowlist_entries.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// High/critical findings with no allowlist entry
    pub vulnerabilities: Vec<VulnerabilityInfo>,
    /// Findings covered by a valid allowlist entry
    pub allowed_vulnerabilities: Vec<VulnerabilityInfo>,
    /// Findings whose allowlist entry has lapsed
    pub expired_allowlist_entries: Vec<VulnerabilityInfo>,
    /// Subset of `allowed_vulnerabilities` whose entry lapses soon
    pub expiring_entries: Vec<VulnerabilityInfo>,
    pub is_successful: bool,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::from_buckets(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

impl AnalysisResult {
    /// Assemble a result from its buckets, deriving the verdict.
    #[must_use]
    pub fn from_buckets(
        vulnerabilities: Vec<VulnerabilityInfo>,
        allowed_vulnerabilities: Vec<VulnerabilityInfo>,
        expired_allowlist_entries: Vec<VulnerabilityInfo>,
        expiring_entries: Vec<VulnerabilityInfo>,
    ) -> Self {
        let is_successful = vulnerabilities.is_empty() && expired_allowlist_entries.is_empty();
        Self {
            vulnerabilities,
            allowed_vulnerabilities,
            expired_allowlist_entries,
            expiring_entries,
            is_successful,
        }
    }

    /// Number of high/critical findings that were classified.
    #[must_use]
    pub fn classified_count(&self) -> usize {
        self.vulnerabilities.len()
            + self.allowed_vulnerabilities.len()
            + self.expired_allowlist_entries.len()
    }

    /// Number of findings that fail the gate.
    #[must_use]
    pub fn blocking_count(&self) -> usize {
        self.vulnerabilities.len() + self.expired_allowlist_entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, SourceFormat};

    fn info(status: AllowlistStatus) -> VulnerabilityInfo {
        VulnerabilityInfo {
            vulnerability: CanonicalVulnerability {
                id: "1001".to_string(),
                package: "lodash".to_string(),
                severity: Severity::Critical,
                title: "Prototype Pollution".to_string(),
                url: String::new(),
                vulnerable_versions: "<4.17.21".to_string(),
                source_format: SourceFormat::Legacy,
            },
            allowlist_status: status,
            reason: None,
            expires_on: None,
        }
    }

    #[test]
    fn test_success_derived_from_buckets() {
        let ok = AnalysisResult::from_buckets(vec![], vec![info(AllowlistStatus::Allowed)], vec![], vec![]);
        assert!(ok.is_successful);

        let new = AnalysisResult::from_buckets(vec![info(AllowlistStatus::New)], vec![], vec![], vec![]);
        assert!(!new.is_successful);

        let expired =
            AnalysisResult::from_buckets(vec![], vec![], vec![info(AllowlistStatus::Expired)], vec![]);
        assert!(!expired.is_successful);
        assert_eq!(expired.blocking_count(), 1);
    }

    #[test]
    fn test_default_result_passes() {
        assert!(AnalysisResult::default().is_successful);
    }

    #[test]
    fn test_info_serializes_flat() {
        let mut item = info(AllowlistStatus::Expired);
        item.reason = Some("no fix".to_string());
        item.expires_on = Some("2020-01-01".to_string());

        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["id"], "1001");
        assert_eq!(json["package"], "lodash");
        assert_eq!(json["allowlistStatus"], "expired");
        assert_eq!(json["expiresOn"], "2020-01-01");
        assert!(json.get("vulnerability").is_none());
    }

    #[test]
    fn test_result_uses_wire_field_names() {
        let json = serde_json::to_value(AnalysisResult::default()).expect("serialize");
        for field in [
            "vulnerabilities",
            "allowedVulnerabilities",
            "expiredAllowlistEntries",
            "expiringEntries",
            "isSuccessful",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
