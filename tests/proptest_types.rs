//! Property-based tests for expiry rules and classification.
//!
//! Ensures the temporal helpers fail closed on arbitrary input and that the
//! classifier's bucket invariants hold across random reports and allowlists.

use audit_gate::model::{
    AllowlistEntry, CanonicalReport, CanonicalVulnerability, Severity, SeverityCounts,
    SourceFormat,
};
use audit_gate::policy::{is_expired, parse_expiry, will_expire_soon, Classifier, ExpiryStatus};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

fn now() -> DateTime<Utc> {
    parse_expiry("2024-06-01").unwrap()
}

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::all().to_vec())
}

fn vulnerability() -> impl Strategy<Value = CanonicalVulnerability> {
    (0u8..6, 0u8..4, severity()).prop_map(|(id, package, severity)| CanonicalVulnerability {
        id: format!("{}", 1000 + u32::from(id)),
        package: format!("pkg-{package}"),
        severity,
        title: "advisory".to_string(),
        url: String::new(),
        vulnerable_versions: "*".to_string(),
        source_format: SourceFormat::Legacy,
    })
}

/// Expiration values: relative dates, missing, or garbage.
fn expires() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        (-400i64..400).prop_map(|days| Some(
            (now() + Duration::days(days)).format("%Y-%m-%d").to_string()
        )),
        Just(None),
        "[a-z ]{0,12}".prop_map(Some),
    ]
}

/// Allowlists with unique `(id, package)` pairs, as the loader guarantees.
fn allowlist() -> impl Strategy<Value = Vec<AllowlistEntry>> {
    prop::collection::vec((0u8..6, 0u8..4, expires()), 0..12).prop_map(|raw| {
        let mut seen = HashSet::new();
        raw.into_iter()
            .filter(|(id, package, _)| seen.insert((*id, *package)))
            .map(|(id, package, expires)| {
                let mut entry = AllowlistEntry::new(
                    format!("{}", 1000 + u32::from(id)),
                    format!("pkg-{package}"),
                    "accepted",
                );
                entry.expires = expires;
                entry
            })
            .collect()
    })
}

fn key(v: &audit_gate::model::VulnerabilityInfo) -> (String, String) {
    (v.id().to_string(), v.package().to_string())
}

proptest! {
    // 1000 cases because these checks are fast and benefit from broader
    // input coverage.
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn parse_expiry_doesnt_panic(s in "\\PC{0,60}") {
        let _ = parse_expiry(&s);
    }

    #[test]
    fn unparseable_expiry_is_expired(s in "[a-zA-Z ]{0,30}") {
        prop_assume!(parse_expiry(&s).is_none());
        prop_assert!(is_expired(Some(&s), now()));
        prop_assert!(!will_expire_soon(Some(&s), now(), 30));
        prop_assert!(!ExpiryStatus::evaluate(Some(&s), now(), 30).is_honored());
    }

    #[test]
    fn expiring_implies_not_expired(expires in expires(), days in 1i64..=365) {
        if will_expire_soon(expires.as_deref(), now(), days) {
            prop_assert!(!is_expired(expires.as_deref(), now()));
        }
    }

    #[test]
    fn extreme_windows_dont_panic(days in any::<i64>(), offset in any::<i32>()) {
        let expires = (now() + Duration::seconds(i64::from(offset))).to_rfc3339();
        let _ = will_expire_soon(Some(&expires), now(), days);
    }

    #[test]
    fn classification_invariants(
        vulnerabilities in prop::collection::vec(vulnerability(), 0..20),
        allowlist in allowlist(),
        days in 1i64..=365,
    ) {
        let report = CanonicalReport::new(vulnerabilities.clone(), SeverityCounts::default());
        let result = Classifier::new(days).classify(&report, &allowlist, now());

        // Every gating vulnerability lands in exactly one of new/allowed/expired
        let gating = vulnerabilities.iter().filter(|v| v.severity.is_gating()).count();
        prop_assert_eq!(result.classified_count(), gating);

        // Nothing below the floor is classified
        let all = result
            .vulnerabilities
            .iter()
            .chain(&result.allowed_vulnerabilities)
            .chain(&result.expired_allowlist_entries)
            .chain(&result.expiring_entries);
        for info in all {
            prop_assert!(info.vulnerability.severity.is_gating());
        }

        // New findings have no entry; classified findings do
        let keys: HashSet<_> = allowlist.iter().map(|e| (e.id.clone(), e.package.clone())).collect();
        for info in &result.vulnerabilities {
            prop_assert!(!keys.contains(&key(info)));
        }
        for info in result.allowed_vulnerabilities.iter().chain(&result.expired_allowlist_entries) {
            prop_assert!(keys.contains(&key(info)));
        }

        // Expiring is a subset of allowed
        for info in &result.expiring_entries {
            prop_assert!(result.allowed_vulnerabilities.contains(info));
        }

        // Verdict is derived from the blocking buckets
        prop_assert_eq!(
            result.is_successful,
            result.vulnerabilities.is_empty() && result.expired_allowlist_entries.is_empty()
        );
    }

    #[test]
    fn classification_is_deterministic(
        vulnerabilities in prop::collection::vec(vulnerability(), 0..20),
        allowlist in allowlist(),
    ) {
        let report = CanonicalReport::new(vulnerabilities, SeverityCounts::default());
        let first = Classifier::default().classify(&report, &allowlist, now());
        let second = Classifier::default().classify(&report, &allowlist, now());
        prop_assert_eq!(first, second);
    }
}
