//! Advisory severity levels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity reported by the audit tool for a single advisory.
///
/// Variants are ordered from least to most severe so that comparisons such as
/// `severity >= Severity::High` read naturally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Lowest severity that takes part in the pass/fail decision.
    pub const FLOOR: Self = Self::High;

    /// All severities, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Info,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::Critical,
        ]
    }

    /// Lowercase name as emitted by the audit tool.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether findings of this severity can fail the gate.
    #[must_use]
    pub fn is_gating(&self) -> bool {
        *self >= Self::FLOOR
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("invalid severity: '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_high_and_critical_gate() {
        assert!(!Severity::Info.is_gating());
        assert!(!Severity::Low.is_gating());
        assert!(!Severity::Moderate.is_gating());
        assert!(Severity::High.is_gating());
        assert!(Severity::Critical.is_gating());
    }

    #[test]
    fn test_parse_and_display_agree() {
        for severity in Severity::all() {
            let parsed: Severity = severity.to_string().parse().expect("should parse");
            assert_eq!(parsed, *severity);
        }
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
        assert!("medium".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Severity::Moderate).expect("serialize");
        assert_eq!(json, "\"moderate\"");
        let back: Severity = serde_json::from_str("\"high\"").expect("deserialize");
        assert_eq!(back, Severity::High);
    }
}
