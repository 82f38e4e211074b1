//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for CI logs and terminals.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{AnalysisResult, Severity, VulnerabilityInfo};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "red",
        Severity::Moderate => "yellow",
        Severity::Low | Severity::Info => "dim",
    }
}

const fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn push_section(
        &self,
        lines: &mut Vec<String>,
        title: &str,
        title_color: &str,
        items: &[VulnerabilityInfo],
    ) {
        if items.is_empty() {
            return;
        }
        lines.push(String::new());
        lines.push(self.color(&format!("{title} ({}):", items.len()), title_color));
        for item in items {
            self.push_item(lines, item);
        }
    }

    fn push_item(&self, lines: &mut Vec<String>, item: &VulnerabilityInfo) {
        let v = &item.vulnerability;
        lines.push(format!(
            "  {} {} {} {}",
            self.color(&format!("[{}]", v.severity), severity_color(v.severity)),
            self.color(&v.package, "bold"),
            v.id,
            v.title
        ));
        lines.push(format!(
            "      {}  {}",
            self.color("versions:", "dim"),
            v.vulnerable_versions
        ));
        if !v.url.is_empty() {
            lines.push(format!("      {}  {}", self.color("url:", "dim"), v.url));
        }
        if let Some(reason) = &item.reason {
            lines.push(format!("      {}  {}", self.color("reason:", "dim"), reason));
        }
        if item.reason.is_some() {
            lines.push(format!(
                "      {}  {}",
                self.color("expires:", "dim"),
                item.expires_on.as_deref().unwrap_or("(none)")
            ));
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(
        &self,
        result: &AnalysisResult,
        context: &ReportContext,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        // Header
        lines.push(self.color("Dependency Audit Gate", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let Some(path) = &context.metadata.report_path {
            lines.push(format!("{}  {}", self.color("Report:", "cyan"), path));
        }
        if let Some(path) = &context.metadata.allowlist_path {
            lines.push(format!("{}  {}", self.color("Allowlist:", "cyan"), path));
        }
        lines.push(format!(
            "{}  {}",
            self.color("Evaluated:", "cyan"),
            context.evaluated_at.to_rfc3339()
        ));

        // Severity counts
        let counts = &context.severity_counts;
        let breakdown = Severity::all()
            .iter()
            .rev()
            .map(|s| format!("{} {}", counts.get(*s), s))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "{}  {} total ({breakdown})",
            self.color("Findings:", "cyan"),
            counts.total
        ));

        self.push_section(&mut lines, "New vulnerabilities", "red", &result.vulnerabilities);
        self.push_section(
            &mut lines,
            "Expired allowlist entries",
            "red",
            &result.expired_allowlist_entries,
        );
        self.push_section(
            &mut lines,
            &format!("Expiring within {} days", context.expiring_days),
            "yellow",
            &result.expiring_entries,
        );

        if !result.allowed_vulnerabilities.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "{} {} allowed by the allowlist",
                self.color(&format!("✓{}", result.allowed_vulnerabilities.len()), "green"),
                plural(result.allowed_vulnerabilities.len(), "vulnerability", "vulnerabilities")
            ));
        }

        if !context.unused_entries.is_empty() {
            lines.push(String::new());
            lines.push(self.color(
                &format!("Unused allowlist entries ({}):", context.unused_entries.len()),
                "dim",
            ));
            for entry in &context.unused_entries {
                lines.push(format!("  {} {}", entry.package, entry.id));
            }
        }

        // Verdict
        lines.push(String::new());
        if result.is_successful {
            lines.push(self.color("PASSED", "green"));
        } else {
            let blocking = result.blocking_count();
            lines.push(format!(
                "{}  {blocking} blocking {}",
                self.color("FAILED", "red"),
                plural(blocking, "finding", "findings")
            ));
        }

        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
