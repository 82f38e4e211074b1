//! Canonical, format-independent audit report.

use super::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used when an advisory does not state which versions are affected.
pub const ANY_VERSION: &str = "*";

/// Audit report shape a vulnerability was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Advisory-keyed report (`advisories` map)
    Legacy,
    /// Package-keyed report (`vulnerabilities` map with `via` entries)
    Modern,
}

impl SourceFormat {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Summary counts by severity, copied from the report's metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SeverityCounts {
    pub info: u64,
    pub low: u64,
    pub moderate: u64,
    pub high: u64,
    pub critical: u64,
    pub total: u64,
}

impl SeverityCounts {
    /// Count for a single severity level.
    #[must_use]
    pub const fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Info => self.info,
            Severity::Low => self.low,
            Severity::Moderate => self.moderate,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    /// Number of findings at or above the severity floor.
    #[must_use]
    pub const fn gating(&self) -> u64 {
        self.high + self.critical
    }
}

/// One advisory affecting one package, independent of the report shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVulnerability {
    /// Advisory identifier, always in string form
    pub id: String,
    /// Affected package name
    pub package: String,
    pub severity: Severity,
    pub title: String,
    pub url: String,
    /// Affected version range, `*` when unknown
    pub vulnerable_versions: String,
    pub source_format: SourceFormat,
}

impl CanonicalVulnerability {
    /// Key used to match this vulnerability against the allowlist.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (self.id.as_str(), self.package.as_str())
    }
}

/// Normalized audit report.
///
/// Built once per run by one of the normalizers and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalReport {
    /// Vulnerabilities in document order
    pub vulnerabilities: Vec<CanonicalVulnerability>,
    pub severity_counts: SeverityCounts,
}

impl CanonicalReport {
    #[must_use]
    pub const fn new(
        vulnerabilities: Vec<CanonicalVulnerability>,
        severity_counts: SeverityCounts,
    ) -> Self {
        Self {
            vulnerabilities,
            severity_counts,
        }
    }

    /// Report that only carries summary counts (fallback extraction).
    #[must_use]
    pub const fn counts_only(severity_counts: SeverityCounts) -> Self {
        Self {
            vulnerabilities: Vec::new(),
            severity_counts,
        }
    }

    #[must_use]
    pub fn vulnerability_count(&self) -> usize {
        self.vulnerabilities.len()
    }

    /// Vulnerabilities that take part in the gate decision.
    pub fn gating_vulnerabilities(&self) -> impl Iterator<Item = &CanonicalVulnerability> {
        self.vulnerabilities.iter().filter(|v| v.severity.is_gating())
    }
}
