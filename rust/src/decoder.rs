//! Recurrence decoding: weekly masks into per-day buckets.

use std::collections::HashMap;

use crate::models::{active_days, Event};

/// Events bucketed by day key ("1" = Monday .. "5" = Friday).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedWeek {
    /// Events with a start and end time.
    pub by_day: HashMap<String, Vec<Event>>,
    /// Events carrying a "no time" sentinel on either end.
    pub untimed_by_day: HashMap<String, Vec<Event>>,
}

/// Day key for a 1-based weekday index.
pub fn day_key(day_index: u32) -> String {
    day_index.to_string()
}

/// Split events into one occurrence per active weekday bit.
///
/// Bucket order follows input order. Events without any weekday bit are
/// dropped here; validation rejects them before they are stored.
pub fn decode(events: &[Event]) -> DecodedWeek {
    let mut week = DecodedWeek::default();

    for event in events {
        let target = if event.is_untimed() {
            &mut week.untimed_by_day
        } else {
            &mut week.by_day
        };
        for day in active_days(event.day) {
            target.entry(day_key(day)).or_default().push(event.clone());
        }
    }

    week
}
