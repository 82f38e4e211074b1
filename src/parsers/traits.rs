//! Parser error types and the normalization trait.

use crate::model::{CanonicalReport, SourceFormat};
use thiserror::Error;

/// Errors that can occur while turning audit output into a canonical report
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    /// The text is not syntactically valid JSON
    #[error("Audit report is not valid JSON: {0}")]
    InvalidJson(String),

    /// Valid JSON that matches neither known report shape and has no
    /// salvageable summary counts
    #[error("Unsupported audit report format: {reason}")]
    UnsupportedFormat {
        reason: String,
        /// Violations reported by the legacy schema
        legacy_errors: Vec<String>,
        /// Violations reported by the modern schema
        modern_errors: Vec<String>,
    },

    /// A schema accepted the document but conversion still failed.
    /// This indicates a defect in the schemas or normalizers.
    #[error("Failed to normalize {format} audit report: {message}")]
    Normalization {
        format: SourceFormat,
        message: String,
    },

    /// A bundled schema could not be compiled
    #[error("Invalid bundled schema '{name}': {message}")]
    Schema { name: String, message: String },
}

impl ParseError {
    /// Build an `UnsupportedFormat` error without schema diagnostics.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            reason: reason.into(),
            legacy_errors: Vec::new(),
            modern_errors: Vec::new(),
        }
    }

    /// Schema diagnostics carried by the error, as `(format, message)` pairs.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<(SourceFormat, &str)> {
        match self {
            Self::UnsupportedFormat {
                legacy_errors,
                modern_errors,
                ..
            } => legacy_errors
                .iter()
                .map(|e| (SourceFormat::Legacy, e.as_str()))
                .chain(modern_errors.iter().map(|e| (SourceFormat::Modern, e.as_str())))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// Conversion of a schema-checked raw report into the canonical model.
///
/// Implementations copy summary counts verbatim and never fail on a missing
/// count field.
pub trait NormalizeReport {
    /// Shape this implementation reads.
    const FORMAT: SourceFormat;

    /// Produce the canonical report.
    fn normalize(&self) -> CanonicalReport;
}
