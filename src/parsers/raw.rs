//! Typed raw report shapes shared by both normalizers.

use super::legacy::RawLegacyReport;
use super::modern::RawModernReport;
use super::traits::NormalizeReport;
use crate::model::{CanonicalReport, SeverityCounts, SourceFormat};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Advisory identifier as emitted by the audit tool.
///
/// Older reports use integers, newer ones may use strings. Both are
/// converted to string form before any comparison.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => match integral_u64(n) {
                Some(u) => write!(f, "{u}"),
                None => match n.as_i64() {
                    Some(i) => write!(f, "{i}"),
                    None => write!(f, "{n}"),
                },
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// `metadata` block common to both shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "deserialize_counts")]
    pub vulnerabilities: SeverityCounts,
}

/// Schema `integer` admits `1.0` and values past `u64::MAX`, so counts go
/// through the same lenient reader as the fallback.
fn deserialize_counts<'de, D>(deserializer: D) -> Result<SeverityCounts, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| lenient_counts(&value))
}

/// Optional integer field read with [`integral_u64`].
pub(crate) fn deserialize_lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match value {
        Value::Number(n) => integral_u64(&n),
        _ => None,
    })
}

/// Non-negative integral number as `u64`, saturating at `u64::MAX`.
///
/// Accepts integral floats such as `1.0` or `1e20`; rejects fractions,
/// negatives and non-finite values.
#[must_use]
pub fn integral_u64(n: &serde_json::Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    let f = n.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        // `as` saturates for out-of-range floats
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let saturated = f as u64;
        Some(saturated)
    } else {
        None
    }
}

/// A schema-checked report in one of the two known shapes.
#[derive(Debug, Clone)]
pub enum RawReport {
    Legacy(RawLegacyReport),
    Modern(RawModernReport),
}

impl RawReport {
    #[must_use]
    pub const fn format(&self) -> SourceFormat {
        match self {
            Self::Legacy(_) => SourceFormat::Legacy,
            Self::Modern(_) => SourceFormat::Modern,
        }
    }

    /// Normalize with the shape's own normalizer.
    #[must_use]
    pub fn normalize(&self) -> CanonicalReport {
        match self {
            Self::Legacy(raw) => raw.normalize(),
            Self::Modern(raw) => raw.normalize(),
        }
    }
}

/// Best-effort read of a summary counts object.
///
/// Any field that is missing or not a non-negative integral number counts
/// as zero. Oversized counts saturate.
#[must_use]
pub fn lenient_counts(value: &Value) -> SeverityCounts {
    let field = |name: &str| match value.get(name) {
        Some(Value::Number(n)) => integral_u64(n).unwrap_or(0),
        _ => 0,
    };
    SeverityCounts {
        info: field("info"),
        low: field("low"),
        moderate: field("moderate"),
        high: field("high"),
        critical: field("critical"),
        total: field("total"),
    }
}

/// Empty version ranges mean "any version".
pub(crate) fn version_range_or_any(range: Option<&str>) -> String {
    match range.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => crate::model::ANY_VERSION.to_string(),
    }
}
