//! Input stage: audit report and allowlist loading.
//!
//! All boundary reads happen here, before the classification core runs.

use crate::allowlist::load_allowlist;
use crate::config::ReportSource;
use crate::error::{AuditGateError, ErrorContext, Result};
use crate::model::{AllowlistEntry, CanonicalReport};
use crate::parsers::{check_report_size, FormatResolver, MAX_REPORT_FILE_SIZE};
use std::io::Read;
use std::path::Path;

/// Read the complete audit report text from its source.
///
/// Both sources are capped at [`MAX_REPORT_FILE_SIZE`].
pub fn read_report_text(source: &ReportSource) -> Result<String> {
    match source {
        ReportSource::Stdin => read_capped(std::io::stdin().lock(), MAX_REPORT_FILE_SIZE, "stdin"),
        ReportSource::File(path) => {
            let metadata = std::fs::metadata(path).map_err(|e| AuditGateError::io(path, e))?;
            check_report_size(metadata.len(), MAX_REPORT_FILE_SIZE)
                .with_context(|| path.display().to_string())?;
            std::fs::read_to_string(path).map_err(|e| AuditGateError::io(path, e))
        }
    }
}

/// Read at most one byte past the cap so oversized input is detected without
/// buffering all of it.
fn read_capped(reader: impl Read, limit: u64, name: &str) -> Result<String> {
    let mut content = String::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_string(&mut content)
        .with_context(|| format!("reading audit report from {name}"))?;
    check_report_size(u64::try_from(content.len()).unwrap_or(u64::MAX), limit).context(name)?;
    Ok(content)
}

/// Read and normalize the audit report.
pub fn parse_report_with_context(
    source: &ReportSource,
    resolver: &FormatResolver,
    quiet: bool,
) -> Result<CanonicalReport> {
    if !quiet {
        tracing::info!("Reading audit report: {}", source.display_name());
    }

    let content = read_report_text(source)?;
    let report = resolver
        .parse_str(&content)
        .with_context(|| source.display_name())?;

    if !quiet {
        tracing::info!(
            "Parsed {} vulnerabilities ({} total findings reported)",
            report.vulnerability_count(),
            report.severity_counts.total
        );
    }
    Ok(report)
}

/// Load the allowlist, treating a missing file as empty.
pub fn load_allowlist_with_context(path: &Path, quiet: bool) -> Result<Vec<AllowlistEntry>> {
    let entries = load_allowlist(path).with_context(|| path.display().to_string())?;
    if !quiet {
        tracing::info!("Loaded {} allowlist entries from {}", entries.len(), path.display());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_report_from_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("audit.json");
        std::fs::write(
            &path,
            r#"{"advisories": {"1": {"id": 1, "module_name": "a", "severity": "high", "title": "t"}},
                "metadata": {"vulnerabilities": {"high": 1}}}"#,
        )
        .expect("write");

        let resolver = FormatResolver::new().expect("resolver");
        let report =
            parse_report_with_context(&ReportSource::File(path), &resolver, true).expect("parse");
        assert_eq!(report.vulnerability_count(), 1);
    }

    #[test]
    fn test_missing_report_file_is_io_error() {
        let resolver = FormatResolver::new().expect("resolver");
        let err = parse_report_with_context(
            &ReportSource::File(PathBuf::from("/nonexistent/audit.json")),
            &resolver,
            true,
        )
        .expect_err("missing");
        assert!(matches!(err, AuditGateError::Io { .. }));
    }

    #[test]
    fn test_unsupported_report_carries_path_context() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("audit.json");
        std::fs::write(&path, "[]").expect("write");

        let resolver = FormatResolver::new().expect("resolver");
        let err = parse_report_with_context(&ReportSource::File(path.clone()), &resolver, true)
            .expect_err("unsupported");
        match err {
            AuditGateError::Report { context, .. } => {
                assert_eq!(context, path.display().to_string());
            }
            other => panic!("expected Report error, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_report_file_rejected_before_reading() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("audit.json");
        let file = std::fs::File::create(&path).expect("create");
        // Sparse: no data is written
        file.set_len(MAX_REPORT_FILE_SIZE + 1).expect("set_len");

        let err = read_report_text(&ReportSource::File(path.clone())).expect_err("too large");
        match err {
            AuditGateError::Report { context, source } => {
                assert_eq!(context, path.display().to_string());
                assert!(source.to_string().contains(&MAX_REPORT_FILE_SIZE.to_string()));
            }
            other => panic!("expected Report error, got {other:?}"),
        }
    }

    #[test]
    fn test_capped_reader_limits() {
        let exact = read_capped(std::io::Cursor::new(b"{}".to_vec()), 2, "stdin").expect("fits");
        assert_eq!(exact, "{}");

        // Endless input stops one byte past the limit
        let err = read_capped(std::io::repeat(b' '), 16, "stdin").expect_err("too large");
        match err {
            AuditGateError::Report { context, source } => {
                assert_eq!(context, "stdin");
                assert!(source.to_string().contains("16 byte limit"));
            }
            other => panic!("expected Report error, got {other:?}"),
        }
    }

    #[test]
    fn test_allowlist_error_has_context() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("allow.json");
        std::fs::write(&path, "{").expect("write");
        let err = load_allowlist_with_context(&path, true).expect_err("invalid");
        assert!(matches!(err, AuditGateError::Allowlist { .. }));
    }
}
