//! Allowlist policy records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A vulnerability the team has explicitly accepted.
///
/// Entries are matched against canonical vulnerabilities on the exact
/// `(id, package)` pair. An entry without a valid `expires` date is treated
/// as already expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AllowlistEntry {
    /// Advisory identifier, compared as a string
    #[schemars(length(min = 1))]
    pub id: String,
    /// Package the advisory applies to
    #[schemars(length(min = 1))]
    pub package: String,
    /// Why the risk is accepted
    #[schemars(length(min = 1))]
    pub reason: String,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// ISO-8601 date after which the acceptance lapses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// ISO-8601 date of the last review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_on: Option<String>,
}

impl AllowlistEntry {
    /// Create an entry with the required fields only.
    pub fn new(id: impl Into<String>, package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            package: package.into(),
            reason: reason.into(),
            notes: None,
            expires: None,
            reviewed_on: None,
        }
    }

    /// Set the expiration date.
    #[must_use]
    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    /// Set the review date.
    #[must_use]
    pub fn with_reviewed_on(mut self, reviewed_on: impl Into<String>) -> Self {
        self.reviewed_on = Some(reviewed_on.into());
        self
    }

    /// Set free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Matching key.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (self.id.as_str(), self.package.as_str())
    }

    /// Whether this entry covers the given advisory on the given package.
    #[must_use]
    pub fn matches(&self, id: &str, package: &str) -> bool {
        self.id == id && self.package == package
    }
}
