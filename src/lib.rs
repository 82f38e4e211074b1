//! **A CI gate for dependency vulnerability audits.**
//!
//! `audit-gate` reads the JSON output of a package auditor, classifies every
//! high and critical finding against a team-maintained allowlist, and decides
//! whether the build should be blocked.
//!
//! Two audit report shapes are accepted and normalized into a single
//! [`CanonicalReport`](model::CanonicalReport):
//!
//! - **legacy**: an `advisories` map keyed by advisory id, one record per
//!   vulnerable package.
//! - **modern**: a `vulnerabilities` map keyed by package name, each with a
//!   `via` list of advisories and package references.
//!
//! Reports matching neither shape but carrying `metadata.vulnerabilities`
//! counts are degraded to counts-only reports; anything else is rejected.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: schema-checked format detection and normalization.
//! - **[`allowlist`]**: strict loading and validation of the allowlist file.
//! - **[`policy`]**: expiration rules and the [`Classifier`] that buckets
//!   findings into new, allowed, expired and expiring.
//! - **[`reports`]**: human-readable summary and JSON output.
//! - **[`pipeline`]**: the read → normalize → classify → report workflow and
//!   exit codes.
//!
//! Only `high` and `critical` findings are gating. An allowlist entry keeps
//! suppressing its finding until its `expires` date is reached; entries with
//! no usable `expires` value are treated as expired.
//!
//! ## Getting Started
//!
//! ```no_run
//! use audit_gate::{classify, exit_code, parse_allowlist, parse_report};
//! use chrono::Utc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = parse_report(&std::fs::read_to_string("audit.json")?)?;
//!     let allowlist = parse_allowlist(Some(&std::fs::read_to_string(".audit-allowlist.json")?))?;
//!
//!     let result = classify(&report, &allowlist, Utc::now());
//!     for finding in &result.vulnerabilities {
//!         println!("new: {} in {}", finding.id(), finding.package());
//!     }
//!
//!     std::process::exit(exit_code(&result));
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::fn_params_excessive_bools
)]

pub mod allowlist;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod policy;
pub mod reports;

// Re-export main types for convenience
pub use allowlist::{load_allowlist, parse_allowlist, AllowlistError};
pub use config::{AppConfig, AppConfigBuilder, CheckConfig, ConfigError, Validatable};
pub use error::{AuditGateError, ErrorContext, Result};
pub use model::{
    AllowlistEntry, AllowlistStatus, AnalysisResult, CanonicalReport, CanonicalVulnerability,
    Severity, SeverityCounts, SourceFormat, VulnerabilityInfo,
};
pub use parsers::{detect_format, parse_report, parse_report_file, FormatResolver, ParseError};
pub use pipeline::{exit_code, exit_codes};
pub use policy::{classify, Classifier};
pub use reports::{ReportFormat, ReportGenerator};
