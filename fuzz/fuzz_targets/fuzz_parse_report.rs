#![no_main]
use audit_gate::parsers::FormatResolver;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

static RESOLVER: OnceLock<FormatResolver> = OnceLock::new();

/// Fuzz audit report detection and normalization.
///
/// Exercises schema matching on both shapes, the counts-only fallback and
/// the deserializers behind them.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let resolver = RESOLVER.get_or_init(|| FormatResolver::new().unwrap());
        let _ = resolver.parse_str(s);
    }
});
