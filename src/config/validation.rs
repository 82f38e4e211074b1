//! Configuration validation for audit-gate.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AllowlistConfig, AppConfig, CheckConfig, OutputConfig, PolicyConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Fail with every problem found, joined into one validation error.
    fn ensure_valid(&self) -> crate::error::Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let details = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(crate::error::AuditGateError::validation(details))
    }
}

/// Accepted range for the expiring-soon window.
pub const EXPIRING_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.allowlist.validate());
        errors.extend(self.policy.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for AllowlistConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                errors.push(ConfigError {
                    field: "allowlist.path".to_string(),
                    message: "Path must not be empty".to_string(),
                });
            } else if path.is_dir() {
                errors.push(ConfigError {
                    field: "allowlist.path".to_string(),
                    message: format!("{} is a directory", path.display()),
                });
            }
        }
        errors
    }
}

impl Validatable for PolicyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(days) = self.expiring_days {
            if !EXPIRING_DAYS_RANGE.contains(&days) {
                errors.push(ConfigError {
                    field: "policy.expiring_days".to_string(),
                    message: format!(
                        "Expiring window must be between {} and {} days, got {days}",
                        EXPIRING_DAYS_RANGE.start(),
                        EXPIRING_DAYS_RANGE.end()
                    ),
                });
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(file_path) = &self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        errors
    }
}

impl Validatable for CheckConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !EXPIRING_DAYS_RANGE.contains(&self.expiring_days) {
            errors.push(ConfigError {
                field: "expiring_days".to_string(),
                message: format!(
                    "Expiring window must be between {} and {} days, got {}",
                    EXPIRING_DAYS_RANGE.start(),
                    EXPIRING_DAYS_RANGE.end(),
                    self.expiring_days
                ),
            });
        }
        errors.extend(self.output.validate());
        errors
    }
}
