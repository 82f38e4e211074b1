//! Report type definitions.

use crate::model::{AllowlistEntry, SeverityCounts};
use crate::policy::DEFAULT_EXPIRING_DAYS;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect (currently always the summary)
    #[default]
    Auto,
    /// Human-readable summary
    Summary,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Audit report path, None for stdin
    pub report_path: Option<String>,
    /// Allowlist path that was consulted
    pub allowlist_path: Option<String>,
    /// Tool version
    pub tool_version: String,
}

impl ReportMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }
}

/// Everything a reporter may show besides the classification itself.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub metadata: ReportMetadata,
    /// Summary counts copied from the audit report
    pub severity_counts: SeverityCounts,
    /// Allowlist entries that matched nothing
    pub unused_entries: Vec<AllowlistEntry>,
    /// Time the classification was evaluated at
    pub evaluated_at: DateTime<Utc>,
    /// Expiring-soon window that was applied
    pub expiring_days: i64,
}

impl ReportContext {
    #[must_use]
    pub fn new(severity_counts: SeverityCounts, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReportMetadata::new(),
            severity_counts,
            unused_entries: Vec::new(),
            evaluated_at,
            expiring_days: DEFAULT_EXPIRING_DAYS,
        }
    }

    #[must_use]
    pub fn with_unused_entries(mut self, entries: Vec<AllowlistEntry>) -> Self {
        self.unused_entries = entries;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub const fn with_expiring_days(mut self, days: i64) -> Self {
        self.expiring_days = days;
        self
    }
}
