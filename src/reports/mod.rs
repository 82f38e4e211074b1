//! Report generation for gate results.
//!
//! This module provides the output formats for an [`AnalysisResult`]:
//! - Summary: human-readable terminal output, optionally colored
//! - JSON: structured data for programmatic integration
//!
//! Reporters only render. The exit status is decided by
//! [`crate::pipeline::exit_code`].

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ReportContext, ReportFormat, ReportMetadata};

use crate::model::AnalysisResult;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a classification result
    fn generate(
        &self,
        result: &AnalysisResult,
        context: &ReportContext,
    ) -> Result<String, ReportError>;

    /// Write the rendered report to a writer
    fn write_report(
        &self,
        result: &AnalysisResult,
        context: &ReportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate(result, context)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
