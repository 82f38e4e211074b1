//! Allowlist policy: expiration rules and classification.

mod classifier;
pub mod temporal;

pub use classifier::{classify, Classifier};
pub use temporal::{
    is_expired, parse_expiry, will_expire_soon, ExpiryStatus, DEFAULT_EXPIRING_DAYS,
};

use crate::model::{AllowlistEntry, CanonicalReport};

/// Allowlist entries that match no high or critical vulnerability.
///
/// Informational only; stale entries never affect the verdict.
#[must_use]
pub fn unused_entries<'a>(
    report: &CanonicalReport,
    allowlist: &'a [AllowlistEntry],
) -> Vec<&'a AllowlistEntry> {
    allowlist
        .iter()
        .filter(|entry| {
            !report
                .gating_vulnerabilities()
                .any(|v| entry.matches(&v.id, &v.package))
        })
        .collect()
}
