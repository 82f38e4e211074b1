//! Allowlist loading and validation.
//!
//! The allowlist is a JSON array of [`AllowlistEntry`] objects, conventionally
//! stored in `.audit-allowlist.json`. A missing file is not an error: it means
//! nothing is allowed.
//!
//! Validation is strict. Every entry needs non-empty `id`, `package` and
//! `reason`, optional fields must be strings, unknown fields are rejected and
//! no two entries may share an `(id, package)` pair.

mod validation;

pub use validation::{
    find_duplicates, validate_document, AllowlistIssue, OPTIONAL_FIELDS, REQUIRED_FIELDS,
};

use crate::model::AllowlistEntry;
use crate::policy::temporal::parse_expiry;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional allowlist file name.
pub const DEFAULT_ALLOWLIST_FILE: &str = ".audit-allowlist.json";

/// Errors raised while loading the allowlist
#[derive(Error, Debug)]
pub enum AllowlistError {
    /// The content is not syntactically valid JSON
    #[error("Allowlist is not valid JSON: {0}")]
    Syntax(String),

    /// The document parsed but violates the entry schema
    #[error("Allowlist failed validation:\n{}", format_issues(.issues))]
    Schema { issues: Vec<AllowlistIssue> },

    #[error("Failed to read allowlist '{path}': {message}")]
    Io { path: PathBuf, message: String },
}

impl AllowlistError {
    /// Schema issues, empty for other variants.
    #[must_use]
    pub fn issues(&self) -> &[AllowlistIssue] {
        match self {
            Self::Schema { issues } => issues,
            _ => &[],
        }
    }
}

fn format_issues(issues: &[AllowlistIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse allowlist text.
///
/// `None` stands for "no allowlist file" and yields an empty list.
pub fn parse_allowlist(content: Option<&str>) -> Result<Vec<AllowlistEntry>, AllowlistError> {
    let Some(content) = content else {
        tracing::debug!("No allowlist provided; nothing is allowed");
        return Ok(Vec::new());
    };

    let value: Value =
        serde_json::from_str(content).map_err(|e| AllowlistError::Syntax(e.to_string()))?;

    let issues = validate_document(&value);
    if !issues.is_empty() {
        return Err(AllowlistError::Schema { issues });
    }

    let entries: Vec<AllowlistEntry> = serde_json::from_value(value).map_err(|e| {
        AllowlistError::Schema {
            issues: vec![AllowlistIssue {
                index: None,
                field: None,
                message: e.to_string(),
            }],
        }
    })?;

    let duplicates = find_duplicates(&entries);
    if !duplicates.is_empty() {
        return Err(AllowlistError::Schema { issues: duplicates });
    }

    for entry in &entries {
        match entry.expires.as_deref() {
            Some(expires) if parse_expiry(expires).is_none() => tracing::warn!(
                "Allowlist entry {} ({}) has unparseable expiration '{}'; it will be treated as expired",
                entry.id,
                entry.package,
                expires
            ),
            None => tracing::debug!(
                "Allowlist entry {} ({}) has no expiration; it will be treated as expired",
                entry.id,
                entry.package
            ),
            _ => {}
        }
    }

    tracing::debug!("Loaded {} allowlist entries", entries.len());
    Ok(entries)
}

/// Read an allowlist file, treating a missing file as an empty allowlist.
pub fn load_allowlist(path: &Path) -> Result<Vec<AllowlistEntry>, AllowlistError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_allowlist(Some(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("Allowlist {} not found; no vulnerabilities are allowed", path.display());
            parse_allowlist(None)
        }
        Err(e) => Err(AllowlistError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
