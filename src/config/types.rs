//! Configuration types for audit-gate.
//!
//! Provides the file-level [`AppConfig`] and the fully resolved
//! [`CheckConfig`] a gate run executes with.

use crate::allowlist::DEFAULT_ALLOWLIST_FILE;
use crate::policy::DEFAULT_EXPIRING_DAYS;
use crate::reports::ReportFormat;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Unset optional values fall back to built-in defaults, which keeps "not
/// configured" distinguishable from "configured to the default" when layering
/// CLI arguments over a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Allowlist location
    pub allowlist: AllowlistConfig,
    /// Gate policy knobs
    pub policy: PolicyConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the allowlist path.
    pub fn allowlist_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.allowlist.path = path;
        self
    }

    /// Set the expiring-soon window.
    pub const fn expiring_days(mut self, days: Option<i64>) -> Self {
        self.config.policy.expiring_days = days;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Where to find the allowlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Allowlist file path, `.audit-allowlist.json` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AllowlistConfig {
    /// Effective allowlist path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ALLOWLIST_FILE))
    }
}

/// Gate policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PolicyConfig {
    /// Days before expiration at which allowlist entries are reported as
    /// expiring, 30 when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiring_days: Option<i64>,
}

impl PolicyConfig {
    /// Effective expiring-soon window.
    #[must_use]
    pub fn expiring_days(&self) -> i64 {
        self.expiring_days.unwrap_or(DEFAULT_EXPIRING_DAYS)
    }
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

// ============================================================================
// Resolved Check Configuration
// ============================================================================

/// Where the audit report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    /// Read from standard input
    Stdin,
    /// Read from a file
    File(PathBuf),
}

impl ReportSource {
    /// `None` and `-` mean stdin.
    #[must_use]
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if p.as_os_str() != "-" => Self::File(p),
            _ => Self::Stdin,
        }
    }

    /// Display name for logs and reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Fully resolved configuration for one `check` run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub report: ReportSource,
    pub allowlist_path: PathBuf,
    /// Evaluation time
    pub now: DateTime<Utc>,
    pub expiring_days: i64,
    pub output: OutputConfig,
    pub quiet: bool,
}

impl CheckConfig {
    /// Resolve a check configuration from the layered app config.
    #[must_use]
    pub fn from_app_config(
        config: &AppConfig,
        report: ReportSource,
        now: DateTime<Utc>,
        quiet: bool,
    ) -> Self {
        Self {
            report,
            allowlist_path: config.allowlist.path(),
            now,
            expiring_days: config.policy.expiring_days(),
            output: config.output.clone(),
            quiet,
        }
    }
}
