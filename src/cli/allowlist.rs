//! Allowlist command handlers.
//!
//! `allowlist check` validates the policy document and shows the temporal
//! state of every entry; `allowlist schema` prints its JSON Schema.

use crate::model::AllowlistEntry;
use crate::pipeline::{exit_codes, load_allowlist_with_context};
use crate::policy::ExpiryStatus;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Status of one allowlist entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport<'a> {
    pub index: usize,
    pub id: &'a str,
    pub package: &'a str,
    pub expires: Option<&'a str>,
    pub status: ExpiryStatus,
}

/// Evaluate every entry's expiry status.
#[must_use]
pub fn entry_reports(
    entries: &[AllowlistEntry],
    now: DateTime<Utc>,
    expiring_days: i64,
) -> Vec<EntryReport<'_>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryReport {
            index,
            id: &entry.id,
            package: &entry.package,
            expires: entry.expires.as_deref(),
            status: ExpiryStatus::evaluate(entry.expires.as_deref(), now, expiring_days),
        })
        .collect()
}

fn render_text(path: &Path, reports: &[EntryReport<'_>]) -> String {
    let mut lines = vec![format!("{}: {} entries", path.display(), reports.len())];
    for report in reports {
        lines.push(format!(
            "  [{}] {} {} (expires: {}) {}",
            report.index,
            report.package,
            report.id,
            report.expires.unwrap_or("-"),
            report.status
        ));
    }
    lines.join("\n")
}

/// Run `allowlist check`, returning the desired exit code.
///
/// Returns [`exit_codes::ALLOWLIST_LAPSED`] when any entry would no longer be
/// honored (expired, missing or invalid expiration). That code reports on the
/// allowlist document only; it is not a gate verdict, which comes solely from
/// [`crate::pipeline::exit_code`].
pub fn run_allowlist_check(
    path: &Path,
    now: DateTime<Utc>,
    expiring_days: i64,
    json: bool,
    quiet: bool,
) -> Result<i32> {
    let entries = load_allowlist_with_context(path, quiet)?;
    let reports = entry_reports(&entries, now, expiring_days);

    let output = if json {
        serde_json::to_string_pretty(&reports).context("failed to serialize allowlist status")?
    } else {
        render_text(path, &reports)
    };
    println!("{output}");

    let lapsed = reports.iter().filter(|r| !r.status.is_honored()).count();
    if lapsed > 0 {
        tracing::warn!("{lapsed} allowlist entries are no longer honored");
        Ok(exit_codes::ALLOWLIST_LAPSED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// JSON Schema of the allowlist document.
pub fn allowlist_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(Vec<AllowlistEntry>);
    serde_json::to_string_pretty(&schema)
}

/// Run `allowlist schema`.
pub fn run_allowlist_schema(output: Option<&Path>) -> Result<i32> {
    let schema = allowlist_json_schema()?;
    match output {
        Some(path) => {
            std::fs::write(path, &schema)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Schema written to {}", path.display());
        }
        None => println!("{schema}"),
    }
    Ok(exit_codes::SUCCESS)
}
