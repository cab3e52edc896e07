//! Busy-time constraints derived from personal events.
//!
//! The schedule generator avoids course sections that collide with these.

use serde::{Deserialize, Serialize};

use crate::models::{active_days, Event, WEEKDAY_COUNT};

/// One blocked time range on a set of weekdays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyTime {
    /// Packed (start, end).
    pub time: (i32, i32),
    /// Monday..Friday flags.
    pub days: [bool; WEEKDAY_COUNT as usize],
}

/// Convert timed events into generator constraints, preserving input order.
pub fn busy_times(events: &[Event]) -> Vec<BusyTime> {
    events
        .iter()
        .filter(|e| !e.is_untimed())
        .filter_map(|e| {
            let mut days = [false; WEEKDAY_COUNT as usize];
            for day in active_days(e.day) {
                days[(day - 1) as usize] = true;
            }
            days.contains(&true).then_some(BusyTime {
                time: (e.start_time, e.end_time),
                days,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(id: &str, start: i32, end: i32, day: i32) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            start_time: start,
            end_time: end,
            day,
            professor: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_busy_times() {
        let events = vec![
            make_event("mwf", 900, 950, 0b101010),
            make_event("async", -1, -1, 0b10),
            make_event("nowhere", 1200, 1300, 0),
            make_event("tue", 1400, 1515, 0b100),
        ];
        let busy = busy_times(&events);

        assert_eq!(
            busy,
            vec![
                BusyTime {
                    time: (900, 950),
                    days: [true, false, true, false, true],
                },
                BusyTime {
                    time: (1400, 1515),
                    days: [false, true, false, false, false],
                },
            ]
        );
    }
}
