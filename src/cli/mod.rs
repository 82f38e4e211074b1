//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for a specific CLI subcommand and
//! returns the process exit code.

mod allowlist;
mod check;

pub use allowlist::{
    allowlist_json_schema, entry_reports, run_allowlist_check, run_allowlist_schema, EntryReport,
};
pub use check::run_check;

// Re-export config types used by handlers
pub use crate::config::{CheckConfig, ReportSource};
