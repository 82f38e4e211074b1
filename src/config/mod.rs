//! Configuration module for audit-gate.
//!
//! This module provides a layered configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! The classification core never reads configuration. The CLI resolves a
//! [`CheckConfig`] and hands the relevant values to the pipeline.
//!
//! # Configuration File
//!
//! Place a `.audit-gate.yaml` file in your project root or `~/.config/audit-gate/`:
//!
//! ```yaml
//! allowlist:
//!   path: security/audit-allowlist.json
//! policy:
//!   expiring_days: 14
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AllowlistConfig, AppConfig, AppConfigBuilder, CheckConfig, OutputConfig, PolicyConfig,
    ReportSource,
};
pub use validation::{ConfigError, Validatable, EXPIRING_DAYS_RANGE};

pub use file::{
    discover_config_file, generate_full_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
