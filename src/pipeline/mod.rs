//! Pipeline orchestration for gate runs.
//!
//! This module provides the read → normalize → classify → report workflow
//! shared by the CLI command handlers. The exit status of a run is decided
//! by [`exit_code`] alone.

mod gate_stage;
mod output;
mod parse;
mod report_stage;

pub use gate_stage::{evaluate_gate, GateRun};
pub use output::{resolve_format, should_use_color, write_output, OutputTarget};
pub use parse::{load_allowlist_with_context, parse_report_with_context, read_report_text};
pub use report_stage::output_report;

use crate::model::AnalysisResult;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// No new or expired high/critical findings
    pub const SUCCESS: i32 = 0;
    /// At least one new high/critical finding or expired allowlist entry
    pub const GATE_FAILED: i32 = 1;
    /// `allowlist check` found entries that are no longer honored.
    ///
    /// An allowlist status, not a gate verdict: it shares the value of
    /// [`GATE_FAILED`] only so CI treats both as failures.
    pub const ALLOWLIST_LAPSED: i32 = 1;
}

/// Process exit status for a classification result.
#[must_use]
pub const fn exit_code(result: &AnalysisResult) -> i32 {
    if result.is_successful {
        exit_codes::SUCCESS
    } else {
        exit_codes::GATE_FAILED
    }
}
