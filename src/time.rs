//! Ripple-time codec.
//!
//! The XRP Ledger timestamps everything in seconds since its own epoch,
//! 2000-01-01T00:00:00Z, not the Unix epoch. Resolution is one second.

use chrono::{DateTime, Utc};

/// Seconds between the Unix epoch and the ledger epoch (2000-01-01T00:00:00Z).
pub const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

/// Convert a wall-clock instant to ripple time.
///
/// Instants before the ledger epoch clamp to 0; the ledger cannot
/// represent them.
pub fn to_ripple_time(at: DateTime<Utc>) -> u32 {
    (at.timestamp() - RIPPLE_EPOCH_OFFSET).clamp(0, i64::from(u32::MAX)) as u32
}

/// Convert ripple time back to Unix seconds.
pub fn to_unix_seconds(ripple: u32) -> i64 {
    i64::from(ripple) + RIPPLE_EPOCH_OFFSET
}

/// Ripple time for the current wall clock.
pub fn ripple_time_now() -> u32 {
    to_ripple_time(Utc::now())
}
