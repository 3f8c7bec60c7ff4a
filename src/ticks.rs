//! Tick encoding for the timestamp embedded in the first eight bytes of a sequential GUID.
//!
//! A tick is 100 nanoseconds counted from 0001-01-01T00:00:00 UTC, the resolution and origin
//! used by the platforms that popularized this identifier format. Identifiers produced by this
//! crate therefore carry the same bit pattern as those produced elsewhere for the same instant.
//!
//! The 64-bit tick count is split across the GUID memory layout as a 32-bit field followed by
//! two 16-bit fields, each stored little-endian:
//!
//! ```text
//! byte:   0    1    2    3    4    5    6    7
//! bits: 32.. 40.. 48.. 56.. 16.. 24..  0..  8..
//! ```
//!
//! Read back through the canonical 8-4-4-4-12 text form, the same eight bytes spell the tick
//! count in plain big-endian order.

use chrono::{DateTime, Utc};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: i64 = 100;

/// Tick count of 1970-01-01T00:00:00 UTC, the lower bound of valid embedded timestamps.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Encodes `ticks` into the first eight bytes of a GUID in memory layout.
pub const fn encode(ticks: i64) -> [u8; 8] {
    let t = ticks as u64;
    [
        (t >> 32) as u8,
        (t >> 40) as u8,
        (t >> 48) as u8,
        (t >> 56) as u8,
        (t >> 16) as u8,
        (t >> 24) as u8,
        t as u8,
        (t >> 8) as u8,
    ]
}

/// Decodes the tick count from the first eight bytes of a GUID in memory layout.
pub const fn decode(bytes: [u8; 8]) -> i64 {
    (((bytes[3] as u64) << 56)
        | ((bytes[2] as u64) << 48)
        | ((bytes[1] as u64) << 40)
        | ((bytes[0] as u64) << 32)
        | ((bytes[5] as u64) << 24)
        | ((bytes[4] as u64) << 16)
        | ((bytes[7] as u64) << 8)
        | bytes[6] as u64) as i64
}

/// Returns true if `ticks` lies within `[UNIX_EPOCH_TICKS, now]`.
pub const fn is_valid_tick(ticks: i64, now: i64) -> bool {
    UNIX_EPOCH_TICKS <= ticks && ticks <= now
}

/// Returns the current UTC time in ticks.
pub fn now() -> i64 {
    from_datetime(&Utc::now())
}

/// Converts a UTC timestamp into ticks, discarding precision finer than one tick.
///
/// A leap second is folded into the last tick of the preceding second.
///
/// Timestamps beyond the range of `i64` ticks saturate, which always places them outside the
/// window accepted by [`is_valid_tick`].
pub fn from_datetime(timestamp: &DateTime<Utc>) -> i64 {
    let sub_ticks =
        (i64::from(timestamp.timestamp_subsec_nanos()) / NANOS_PER_TICK).min(TICKS_PER_SECOND - 1);
    timestamp
        .timestamp()
        .saturating_mul(TICKS_PER_SECOND)
        .saturating_add(sub_ticks)
        .saturating_add(UNIX_EPOCH_TICKS)
}

/// Converts ticks into a UTC timestamp, returning `None` if chrono cannot represent it.
pub fn to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    let since_epoch = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    DateTime::from_timestamp(secs, nanos as u32)
}
