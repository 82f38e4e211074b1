//! Audit report parsers.
//!
//! This module turns the raw JSON emitted by the dependency auditor into a
//! [`CanonicalReport`]. Two report shapes are understood:
//!
//! - **legacy**: advisories keyed by advisory id (`advisories` map)
//! - **modern**: vulnerable packages keyed by name, each listing the
//!   advisories that affect it in `via`
//!
//! ## Format Resolution
//!
//! Each shape has its own JSON Schema. The [`FormatResolver`] tries the modern
//! schema first, then the legacy one, and only then falls back to salvaging
//! the `metadata.vulnerabilities` summary counts. Documents that satisfy no
//! schema and carry no counts are rejected with both sets of diagnostics.
//!
//! ## Usage
//!
//! ```no_run
//! use audit_gate::parsers::{parse_report, FormatResolver};
//!
//! let content = std::fs::read_to_string("audit.json").unwrap();
//! let report = parse_report(&content).unwrap();
//! println!("{} vulnerabilities", report.vulnerability_count());
//!
//! // Reuse one resolver for many documents
//! let resolver = FormatResolver::new().unwrap();
//! let again = resolver.parse_str(&content).unwrap();
//! ```

mod detection;
mod legacy;
mod modern;
mod raw;
mod schema;
mod traits;

pub use detection::{DetectionResult, FormatResolver, Resolution};
pub use legacy::{normalize_legacy, RawLegacyAdvisory, RawLegacyReport};
pub use modern::{normalize_modern, RawModernReport, RawModernVulnerability, RawVia, RawViaAdvisory};
pub use raw::{integral_u64, lenient_counts, RawId, RawMetadata, RawReport};
pub use schema::{legacy_schema, modern_schema, ReportValidators, SchemaValidator};
pub use traits::{NormalizeReport, ParseError};

use crate::model::{CanonicalReport, SourceFormat};
use std::path::Path;

/// Maximum audit report size (256 MB), for files and stdin alike.
pub const MAX_REPORT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Reject a report of `len` bytes if it exceeds `limit` bytes.
pub fn check_report_size(len: u64, limit: u64) -> Result<(), ParseError> {
    if len > limit {
        return Err(ParseError::IoError(format!(
            "audit report is larger than the {limit} byte limit"
        )));
    }
    Ok(())
}

/// Parse audit output text into a canonical report.
///
/// Compiles the bundled schemas on every call; use a [`FormatResolver`]
/// directly when parsing more than one document.
pub fn parse_report(content: &str) -> Result<CanonicalReport, ParseError> {
    FormatResolver::new()?.parse_str(content)
}

/// Read and parse an audit report file.
pub fn parse_report_file(path: &Path) -> Result<CanonicalReport, ParseError> {
    check_report_size(std::fs::metadata(path)?.len(), MAX_REPORT_FILE_SIZE)?;
    let content = std::fs::read_to_string(path)?;
    parse_report(&content)
}

/// Detect which report shape `content` has without normalizing it.
///
/// Returns None for invalid JSON and for documents matching neither schema.
#[must_use]
pub fn detect_format(content: &str) -> Option<SourceFormat> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    FormatResolver::new().ok()?.detect(&value).format
}
