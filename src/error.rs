//! Unified error types for audit-gate.
//!
//! Each stage keeps its own error type ([`ParseError`], [`AllowlistError`],
//! [`ReportError`]). This module wraps them with a context chain so a failure
//! can be traced back to the file or step that caused it.

use crate::allowlist::AllowlistError;
use crate::config::ConfigFileError;
use crate::parsers::ParseError;
use crate::reports::ReportError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for audit-gate operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuditGateError {
    /// The audit report could not be parsed or recognized
    #[error("Failed to read audit report: {context}")]
    Report {
        context: String,
        #[source]
        source: ParseError,
    },

    /// The allowlist could not be loaded
    #[error("Failed to load allowlist: {context}")]
    Allowlist {
        context: String,
        #[source]
        source: AllowlistError,
    },

    /// Rendering or writing the result failed
    #[error("Failed to write output: {context}")]
    Output {
        context: String,
        #[source]
        source: ReportError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for audit-gate operations
pub type Result<T> = std::result::Result<T, AuditGateError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AuditGateError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from stage error types
// ============================================================================

impl From<ParseError> for AuditGateError {
    fn from(source: ParseError) -> Self {
        Self::Report {
            context: String::new(),
            source,
        }
    }
}

impl From<AllowlistError> for AuditGateError {
    fn from(source: AllowlistError) -> Self {
        Self::Allowlist {
            context: String::new(),
            source,
        }
    }
}

impl From<ReportError> for AuditGateError {
    fn from(source: ReportError) -> Self {
        Self::Output {
            context: String::new(),
            source,
        }
    }
}

impl From<ConfigFileError> for AuditGateError {
    fn from(err: ConfigFileError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for AuditGateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: err.to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is prepended, so the outermost caller's description comes first:
///
/// ```ignore
/// use audit_gate::error::ErrorContext;
///
/// let entries = load_allowlist(path)
///     .with_context(|| format!("loading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AuditGateError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: AuditGateError, new_ctx: &str) -> AuditGateError {
    match err {
        AuditGateError::Report {
            context: existing,
            source,
        } => AuditGateError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditGateError::Allowlist {
            context: existing,
            source,
        } => AuditGateError::Allowlist {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditGateError::Output {
            context: existing,
            source,
        } => AuditGateError::Output {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditGateError::Io {
            path,
            message,
            source,
        } => AuditGateError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AuditGateError::Config(msg) => AuditGateError::Config(chain_context(new_ctx, &msg)),
        AuditGateError::Validation(msg) => {
            AuditGateError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Join contexts as "`new`: `existing`", or just `new` if there is none yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
