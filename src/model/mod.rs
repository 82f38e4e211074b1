//! Canonical data model for audit reports, allowlists and verdicts.
//!
//! Both audit report shapes are normalized into [`CanonicalReport`] before
//! classification, so everything downstream of the parsers works with a
//! single representation regardless of which tool version produced the input.

mod allowlist;
mod analysis;
mod report;
mod severity;

pub use allowlist::*;
pub use analysis::*;
pub use report::*;
pub use severity::*;
