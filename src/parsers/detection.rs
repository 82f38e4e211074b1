//! Format resolution for audit reports.
//!
//! Resolution is ordered attempt-and-fallthrough against the schemas, never
//! guesswork on field names: modern first (the current tool output), then
//! legacy, then a best-effort extractor that only salvages summary counts.

use super::legacy::RawLegacyReport;
use super::modern::RawModernReport;
use super::raw::{lenient_counts, RawReport};
use super::schema::ReportValidators;
use super::traits::ParseError;
use crate::model::{CanonicalReport, SeverityCounts, SourceFormat};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of resolving a parsed JSON document.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The document matched one of the known shapes.
    Recognized(RawReport),
    /// Neither shape matched but summary counts were found.
    CountsOnly {
        counts: SeverityCounts,
        legacy_errors: Vec<String>,
        modern_errors: Vec<String>,
    },
}

/// Result of format detection without normalization.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Shape that validated, if any
    pub format: Option<SourceFormat>,
    /// Legacy schema violations (empty when legacy validated or was not tried)
    pub legacy_errors: Vec<String>,
    /// Modern schema violations (empty when modern validated)
    pub modern_errors: Vec<String>,
}

impl DetectionResult {
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        self.format.is_some()
    }
}

/// Parse-validate-normalize pipeline for audit reports.
///
/// Owns the compiled schema validators. Build one per process and reuse it.
#[derive(Debug)]
pub struct FormatResolver {
    validators: ReportValidators,
}

impl FormatResolver {
    /// Create a resolver with freshly compiled bundled schemas.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self::with_validators(ReportValidators::new()?))
    }

    /// Create a resolver around existing validators.
    #[must_use]
    pub const fn with_validators(validators: ReportValidators) -> Self {
        Self { validators }
    }

    #[must_use]
    pub const fn validators(&self) -> &ReportValidators {
        &self.validators
    }

    /// Determine which shape `value` has, collecting diagnostics.
    #[must_use]
    pub fn detect(&self, value: &Value) -> DetectionResult {
        let modern_errors = match self.validators.modern.validate(value) {
            Ok(()) => {
                return DetectionResult {
                    format: Some(SourceFormat::Modern),
                    legacy_errors: Vec::new(),
                    modern_errors: Vec::new(),
                }
            }
            Err(errors) => errors,
        };

        match self.validators.legacy.validate(value) {
            Ok(()) => DetectionResult {
                format: Some(SourceFormat::Legacy),
                legacy_errors: Vec::new(),
                modern_errors,
            },
            Err(legacy_errors) => DetectionResult {
                format: None,
                legacy_errors,
                modern_errors,
            },
        }
    }

    /// Resolve a parsed document into a raw report or salvaged counts.
    pub fn resolve(&self, value: &Value) -> Result<Resolution, ParseError> {
        if !value.is_object() {
            return Err(ParseError::unsupported(format!(
                "top-level JSON value is {}, expected an object",
                json_kind(value)
            )));
        }

        let detection = self.detect(value);
        tracing::debug!(
            "Audit format detection: format={:?}, modern_errors={}, legacy_errors={}",
            detection.format,
            detection.modern_errors.len(),
            detection.legacy_errors.len()
        );

        match detection.format {
            Some(SourceFormat::Modern) => Ok(Resolution::Recognized(RawReport::Modern(
                deserialize_raw::<RawModernReport>(value, SourceFormat::Modern)?,
            ))),
            Some(SourceFormat::Legacy) => Ok(Resolution::Recognized(RawReport::Legacy(
                deserialize_raw::<RawLegacyReport>(value, SourceFormat::Legacy)?,
            ))),
            None => {
                let DetectionResult {
                    legacy_errors,
                    modern_errors,
                    ..
                } = detection;
                match extract_counts(value) {
                    Some(counts) => Ok(Resolution::CountsOnly {
                        counts,
                        legacy_errors,
                        modern_errors,
                    }),
                    None => Err(ParseError::UnsupportedFormat {
                        reason: "document matches neither the legacy nor the modern audit \
                                 report schema and has no metadata.vulnerabilities counts"
                            .to_string(),
                        legacy_errors,
                        modern_errors,
                    }),
                }
            }
        }
    }

    /// Normalize an already parsed document.
    pub fn normalize_value(&self, value: &Value) -> Result<CanonicalReport, ParseError> {
        match self.resolve(value)? {
            Resolution::Recognized(raw) => {
                let report = raw.normalize();
                tracing::debug!(
                    "Normalized {} audit report: {} vulnerabilities",
                    raw.format(),
                    report.vulnerability_count()
                );
                Ok(report)
            }
            Resolution::CountsOnly {
                counts,
                legacy_errors,
                modern_errors,
            } => {
                tracing::warn!(
                    "Unrecognized audit report format; using summary counts only, \
                     vulnerability details could not be extracted"
                );
                for error in legacy_errors.iter().take(MAX_LOGGED_DIAGNOSTICS) {
                    tracing::debug!("legacy schema: {}", error);
                }
                for error in modern_errors.iter().take(MAX_LOGGED_DIAGNOSTICS) {
                    tracing::debug!("modern schema: {}", error);
                }
                Ok(CanonicalReport::counts_only(counts))
            }
        }
    }

    /// Parse raw audit output into a canonical report.
    pub fn parse_str(&self, content: &str) -> Result<CanonicalReport, ParseError> {
        let value: Value = serde_json::from_str(content)?;
        self.normalize_value(&value)
    }
}

/// Schema diagnostics logged per shape on the fallback path.
const MAX_LOGGED_DIAGNOSTICS: usize = 10;

fn deserialize_raw<T: DeserializeOwned>(
    value: &Value,
    format: SourceFormat,
) -> Result<T, ParseError> {
    T::deserialize(value).map_err(|e| ParseError::Normalization {
        format,
        message: e.to_string(),
    })
}

/// Fallback extractor: `metadata.vulnerabilities` as an object.
fn extract_counts(value: &Value) -> Option<SeverityCounts> {
    value
        .get("metadata")
        .and_then(|m| m.get("vulnerabilities"))
        .filter(|v| v.is_object())
        .map(lenient_counts)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
