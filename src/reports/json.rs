//! JSON report generator.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{AnalysisResult, SeverityCounts};
use crate::pipeline::exit_code;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        result: &AnalysisResult,
        context: &ReportContext,
    ) -> Result<String, ReportError> {
        let report = JsonGateReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: &context.metadata.tool_version,
                },
                generated_at: context.evaluated_at.to_rfc3339(),
                report_path: context.metadata.report_path.as_deref(),
                allowlist_path: context.metadata.allowlist_path.as_deref(),
                expiring_days: context.expiring_days,
            },
            severity_counts: &context.severity_counts,
            result,
            unused_allowlist_entries: context
                .unused_entries
                .iter()
                .map(|e| UnusedEntry {
                    id: &e.id,
                    package: &e.package,
                })
                .collect(),
            exit_code: exit_code(result),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(|e| ReportError::SerializationError(e.to_string()))?;

        Ok(json + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// ============================================================================
// JSON Structures
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonGateReport<'a> {
    metadata: JsonReportMetadata<'a>,
    severity_counts: &'a SeverityCounts,
    #[serde(flatten)]
    result: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unused_allowlist_entries: Vec<UnusedEntry<'a>>,
    exit_code: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReportMetadata<'a> {
    tool: ToolInfo<'a>,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowlist_path: Option<&'a str>,
    expiring_days: i64,
}

#[derive(Serialize)]
struct ToolInfo<'a> {
    name: &'static str,
    version: &'a str,
}

#[derive(Serialize)]
struct UnusedEntry<'a> {
    id: &'a str,
    package: &'a str,
}
