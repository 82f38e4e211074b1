//! Package-keyed ("modern") audit report shape.
//!
//! Each package record lists the advisories that make it vulnerable in
//! `via`. Entries are either inline advisory objects or plain strings naming
//! another vulnerable package that this one depends on.
//!
//! ```json
//! {
//!   "auditReportVersion": 2,
//!   "vulnerabilities": {
//!     "express": { "name": "express", "severity": "high", "via": ["body-parser"] },
//!     "body-parser": {
//!       "name": "body-parser",
//!       "severity": "high",
//!       "via": [{ "source": 1096, "title": "DoS", "severity": "high", "range": "<1.20.3" }]
//!     }
//!   },
//!   "metadata": { "vulnerabilities": { "high": 2, "total": 2 } }
//! }
//! ```

use super::raw::{deserialize_lenient_u64, version_range_or_any, RawId, RawMetadata};
use super::traits::NormalizeReport;
use crate::model::{CanonicalReport, CanonicalVulnerability, Severity, SourceFormat};
use indexmap::IndexMap;
use serde::Deserialize;

/// Raw modern report. Fields the normalizer does not read are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModernReport {
    #[serde(default, deserialize_with = "deserialize_lenient_u64")]
    pub audit_report_version: Option<u64>,
    /// Package name -> vulnerability record, in document order
    pub vulnerabilities: IndexMap<String, RawModernVulnerability>,
    pub metadata: RawMetadata,
}

/// Vulnerability record for one package.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModernVulnerability {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub via: Vec<RawVia>,
}

/// One `via` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawVia {
    /// Name of another vulnerable package; carries no advisory data
    Package(String),
    /// Inline advisory
    Advisory(RawViaAdvisory),
}

/// Inline advisory inside `via`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawViaAdvisory {
    pub source: RawId,
    #[serde(default)]
    pub name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub range: Option<String>,
}

impl RawViaAdvisory {
    fn to_canonical(&self, package: &str) -> CanonicalVulnerability {
        CanonicalVulnerability {
            id: self.source.to_string(),
            package: package.to_string(),
            severity: self.severity,
            title: self.title.clone(),
            url: self.url.clone().unwrap_or_default(),
            vulnerable_versions: version_range_or_any(self.range.as_deref()),
            source_format: SourceFormat::Modern,
        }
    }
}

impl NormalizeReport for RawModernReport {
    const FORMAT: SourceFormat = SourceFormat::Modern;

    fn normalize(&self) -> CanonicalReport {
        let vulnerabilities = self
            .vulnerabilities
            .iter()
            .flat_map(|(package, record)| {
                record.via.iter().filter_map(move |via| match via {
                    RawVia::Advisory(advisory) => Some(advisory.to_canonical(package)),
                    RawVia::Package(_) => None,
                })
            })
            .collect();
        CanonicalReport::new(vulnerabilities, self.metadata.vulnerabilities)
    }
}

/// Normalize a modern report: one canonical vulnerability per inline `via`
/// advisory, string references skipped.
#[must_use]
pub fn normalize_modern(raw: &RawModernReport) -> CanonicalReport {
    raw.normalize()
}
