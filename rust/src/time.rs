//! Packed time-of-day helpers.
//!
//! Times travel as `hour * 100 + minute` integers (1330 = 13:30). Both `0`
//! and `-1` mean "no specific time"; the two sentinels are kept equivalent.

use chrono::{NaiveTime, Timelike};

use crate::validation::ValidationError;

/// Packed `hour * 100 + minute` time of day.
pub type PackedTime = i32;

/// Sentinel values meaning the event has no assigned time.
pub const UNTIMED_SENTINELS: [PackedTime; 2] = [0, -1];

/// True when `time` is one of the "no specific time" sentinels.
#[inline]
pub fn is_untimed(time: PackedTime) -> bool {
    UNTIMED_SENTINELS.contains(&time)
}

/// Convert a packed time to a `NaiveTime`.
///
/// Returns `None` for sentinels and for anything outside 00:00-23:59.
pub fn to_time_of_day(time: PackedTime) -> Option<NaiveTime> {
    if is_untimed(time) || time < 0 {
        return None;
    }
    let hours = u32::try_from(time / 100).ok()?;
    let minutes = u32::try_from(time % 100).ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Minutes since midnight, or `None` for sentinels and malformed values.
pub fn minutes_of_day(time: PackedTime) -> Option<i32> {
    to_time_of_day(time).map(|t| (t.hour() * 60 + t.minute()) as i32)
}

/// Format a packed time as "HH:MM".
///
/// Sentinels and malformed values render as "00:00".
pub fn format_packed(time: PackedTime) -> String {
    match to_time_of_day(time) {
        Some(t) => t.format("%H:%M").to_string(),
        None => "00:00".to_string(),
    }
}

/// Pack a `NaiveTime` into `hour * 100 + minute`.
pub fn pack(time: NaiveTime) -> PackedTime {
    (time.hour() * 100 + time.minute()) as PackedTime
}

/// Parse "HH:MM" form input into a packed time.
///
/// An empty input yields the `-1` sentinel (no time).
pub fn parse_packed(field: &str, input: &str) -> Result<PackedTime, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(-1);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(pack)
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a valid HH:MM time", trimmed)))
}
