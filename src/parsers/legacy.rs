//! Advisory-keyed ("legacy") audit report shape.
//!
//! ```json
//! {
//!   "advisories": {
//!     "1001": {
//!       "id": 1001,
//!       "module_name": "lodash",
//!       "severity": "critical",
//!       "title": "Prototype Pollution",
//!       "url": "https://npmjs.com/advisories/1001",
//!       "vulnerable_versions": "<4.17.21"
//!     }
//!   },
//!   "metadata": { "vulnerabilities": { "critical": 1 } }
//! }
//! ```

use super::raw::{version_range_or_any, RawId, RawMetadata};
use super::traits::NormalizeReport;
use crate::model::{CanonicalReport, CanonicalVulnerability, Severity, SourceFormat};
use indexmap::IndexMap;
use serde::Deserialize;

/// Raw legacy report. Fields the normalizer does not read are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyReport {
    /// Advisory id -> advisory, in document order
    pub advisories: IndexMap<String, RawLegacyAdvisory>,
    pub metadata: RawMetadata,
}

/// One advisory of a legacy report.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyAdvisory {
    pub id: RawId,
    pub module_name: String,
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub vulnerable_versions: Option<String>,
}

impl RawLegacyAdvisory {
    fn to_canonical(&self) -> CanonicalVulnerability {
        CanonicalVulnerability {
            id: self.id.to_string(),
            package: self.module_name.clone(),
            severity: self.severity,
            title: self.title.clone(),
            url: self.url.clone().unwrap_or_default(),
            vulnerable_versions: version_range_or_any(self.vulnerable_versions.as_deref()),
            source_format: SourceFormat::Legacy,
        }
    }
}

impl NormalizeReport for RawLegacyReport {
    const FORMAT: SourceFormat = SourceFormat::Legacy;

    fn normalize(&self) -> CanonicalReport {
        let vulnerabilities = self
            .advisories
            .values()
            .map(RawLegacyAdvisory::to_canonical)
            .collect();
        CanonicalReport::new(vulnerabilities, self.metadata.vulnerabilities)
    }
}

/// Normalize a legacy report: one canonical vulnerability per advisory.
#[must_use]
pub fn normalize_legacy(raw: &RawLegacyReport) -> CanonicalReport {
    raw.normalize()
}
