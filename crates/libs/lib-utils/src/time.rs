//! # Time Utilities
//!
//! Conversions between chrono timestamps and the nanosecond timestamps used by ledgers.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Convert nanoseconds since the Unix epoch to a UTC timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn nanos_to_utc(nanos: u64) -> Option<DateTime<Utc>> {
    let secs = (nanos / 1_000_000_000) as i64;
    let sub = (nanos % 1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub)
}

/// Convert a UTC timestamp to nanoseconds since the Unix epoch, clamping pre-epoch values to zero.
pub fn utc_to_nanos(time: DateTime<Utc>) -> u64 {
    time.timestamp_nanos_opt()
        .map(|n| n.max(0) as u64)
        .unwrap_or(u64::MAX)
}
