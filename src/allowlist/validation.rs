//! Structural validation of allowlist documents.
//!
//! Runs on the generic JSON tree before typed deserialization so that every
//! problem in the document is reported at once, with the entry index and
//! field it concerns.

use crate::model::AllowlistEntry;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Allowlist Issue
// ============================================================================

/// A single schema violation in an allowlist document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistIssue {
    /// Index of the offending entry, None for document-level problems
    pub index: Option<usize>,
    /// Field the issue concerns, None when it concerns the whole entry
    pub field: Option<String>,
    /// Description of the problem
    pub message: String,
}

impl AllowlistIssue {
    fn document(message: impl Into<String>) -> Self {
        Self {
            index: None,
            field: None,
            message: message.into(),
        }
    }

    fn entry(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            field: None,
            message: message.into(),
        }
    }

    fn field(index: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for AllowlistIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.index, &self.field) {
            (Some(i), Some(field)) => write!(f, "entry {i}: {field}: {}", self.message),
            (Some(i), None) => write!(f, "entry {i}: {}", self.message),
            (None, _) => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// Field Rules
// ============================================================================

/// Fields every entry must carry as non-empty strings.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "package", "reason"];

/// Fields an entry may carry as strings.
pub const OPTIONAL_FIELDS: [&str; 3] = ["notes", "expires", "reviewedOn"];

fn is_known_field(name: &str) -> bool {
    REQUIRED_FIELDS.contains(&name) || OPTIONAL_FIELDS.contains(&name)
}

/// Validate the shape of a parsed allowlist document.
///
/// Returns every issue found; an empty list means the document can be
/// deserialized into entries.
#[must_use]
pub fn validate_document(value: &Value) -> Vec<AllowlistIssue> {
    let Some(items) = value.as_array() else {
        return vec![AllowlistIssue::document(
            "allowlist must be a JSON array of entries",
        )];
    };

    items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| match item.as_object() {
            Some(object) => validate_entry(index, object),
            None => vec![AllowlistIssue::entry(index, "entry must be an object")],
        })
        .collect()
}

fn validate_entry(index: usize, object: &Map<String, Value>) -> Vec<AllowlistIssue> {
    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        match object.get(field) {
            None => issues.push(AllowlistIssue::field(index, field, "required field is missing")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                issues.push(AllowlistIssue::field(index, field, "must not be empty"));
            }
            Some(Value::String(_)) => {}
            Some(_) => issues.push(AllowlistIssue::field(index, field, "must be a string")),
        }
    }

    for field in OPTIONAL_FIELDS {
        if let Some(value) = object.get(field) {
            if !value.is_string() {
                issues.push(AllowlistIssue::field(index, field, "must be a string"));
            }
        }
    }

    for name in object.keys().filter(|k| !is_known_field(k)) {
        issues.push(AllowlistIssue::field(
            index,
            name,
            format!(
                "unknown field; allowed fields are {}",
                REQUIRED_FIELDS
                    .iter()
                    .chain(OPTIONAL_FIELDS.iter())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }

    issues
}

/// Report entries sharing an `(id, package)` pair with an earlier entry.
#[must_use]
pub fn find_duplicates(entries: &[AllowlistEntry]) -> Vec<AllowlistIssue> {
    let mut first_seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut issues = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if let Some(&first) = first_seen.get(&entry.key()) {
            issues.push(AllowlistIssue::entry(
                index,
                format!(
                    "duplicate of entry {first} (id '{}', package '{}')",
                    entry.id, entry.package
                ),
            ));
        } else {
            first_seen.insert(entry.key(), index);
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document_has_no_issues() {
        let doc = json!([
            { "id": "1001", "package": "lodash", "reason": "no fix", "expires": "2999-01-01" },
            { "id": "GHSA-x", "package": "minimist", "reason": "dev only",
              "notes": "tracked", "reviewedOn": "2024-01-01" }
        ]);
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn test_top_level_must_be_array() {
        let issues = validate_document(&json!({ "id": "1" }));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].index.is_none());
    }

    #[test]
    fn test_each_missing_required_field_reported() {
        let issues = validate_document(&json!([{ "notes": "x" }]));
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field.as_deref()).collect();
        assert_eq!(fields, vec!["id", "package", "reason"]);
    }

    #[test]
    fn test_empty_and_mistyped_fields() {
        let issues = validate_document(&json!([
            { "id": 1001, "package": "", "reason": "r", "expires": 20300101 }
        ]));
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("id")));
        assert!(issues
            .iter()
            .any(|i| i.field.as_deref() == Some("package") && i.message.contains("empty")));
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("expires")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let issues = validate_document(&json!([
            { "id": "1", "package": "a", "reason": "r", "expiry": "2030-01-01" }
        ]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("expiry"));
        assert_eq!(issues[0].to_string().split(':').next(), Some("entry 0"));
    }

    #[test]
    fn test_non_object_entry() {
        let issues = validate_document(&json!(["1001"]));
        assert_eq!(issues, vec![AllowlistIssue::entry(0, "entry must be an object")]);
    }

    #[test]
    fn test_duplicates_name_both_indices() {
        let entries = vec![
            AllowlistEntry::new("1001", "lodash", "a"),
            AllowlistEntry::new("1001", "underscore", "b"),
            AllowlistEntry::new("1001", "lodash", "c"),
        ];
        let issues = find_duplicates(&entries);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, Some(2));
        assert!(issues[0].message.contains("entry 0"));
    }
}
