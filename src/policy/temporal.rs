//! Expiration rules for allowlist entries.
//!
//! Every predicate takes the evaluation time as a parameter. All date math is
//! done in UTC. Entries without a usable expiration are expired: acceptance of
//! a risk must be renewed explicitly.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Default "expiring soon" window in days.
pub const DEFAULT_EXPIRING_DAYS: i64 = 30;

/// Local date-time layouts, read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an allowlist date.
///
/// Accepts ISO 8601 in the forms found in hand-written allowlists:
///
/// - RFC 3339 timestamps (`2024-01-01T12:00:00+02:00`)
/// - date-times without an offset or with `Z`, seconds optional
///   (`2024-01-01T12:00:00`, `2024-01-01T12:00Z`), read as UTC
/// - plain `YYYY-MM-DD` dates, meaning midnight UTC of that day
#[must_use]
pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let local = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);
    let naive = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok());
    if let Some(naive) = naive {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// Whether an entry with this expiration is no longer honored at `now`.
///
/// True when the date is absent, unparseable or strictly before `now`.
#[must_use]
pub fn is_expired(expires: Option<&str>, now: DateTime<Utc>) -> bool {
    match expires.and_then(parse_expiry) {
        Some(date) => date < now,
        None => true,
    }
}

/// Whether a still valid entry lapses within `days` days of `now`.
///
/// True iff `now < expires <= now + days`. Expired, missing and unparseable
/// dates are never "expiring soon".
#[must_use]
pub fn will_expire_soon(expires: Option<&str>, now: DateTime<Utc>, days: i64) -> bool {
    let Some(date) = expires.and_then(parse_expiry) else {
        return false;
    };
    if date <= now {
        return false;
    }
    match Duration::try_days(days).and_then(|window| now.checked_add_signed(window)) {
        Some(horizon) => date <= horizon,
        // Window beyond the representable range
        None => days > 0,
    }
}

/// Temporal state of a single allowlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    /// Valid beyond the expiring window
    Valid,
    /// Valid, but lapses within the expiring window
    ExpiringSoon,
    /// Expiration date has passed
    Expired,
    /// No expiration date
    Missing,
    /// Expiration date could not be parsed
    Invalid,
}

impl ExpiryStatus {
    /// Classify an expiration value.
    #[must_use]
    pub fn evaluate(expires: Option<&str>, now: DateTime<Utc>, days: i64) -> Self {
        match expires {
            None => Self::Missing,
            Some(value) if parse_expiry(value).is_none() => Self::Invalid,
            Some(_) if is_expired(expires, now) => Self::Expired,
            Some(_) if will_expire_soon(expires, now, days) => Self::ExpiringSoon,
            Some(_) => Self::Valid,
        }
    }

    /// Whether the entry is still honored.
    #[must_use]
    pub const fn is_honored(&self) -> bool {
        matches!(self, Self::Valid | Self::ExpiringSoon)
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::ExpiringSoon => write!(f, "expiring soon"),
            Self::Expired => write!(f, "expired"),
            Self::Missing => write!(f, "no expiration"),
            Self::Invalid => write!(f, "invalid expiration"),
        }
    }
}
