#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz allowlist validation and expiry evaluation.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(entries) = audit_gate::allowlist::parse_allowlist(Some(s)) {
            let now = chrono::Utc::now();
            for entry in &entries {
                let _ = audit_gate::policy::ExpiryStatus::evaluate(entry.expires.as_deref(), now, 30);
            }
        }
    }
});
