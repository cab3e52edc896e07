//! Core data types for the calendar engine.

use chrono::NaiveTime;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::time::{self, PackedTime};

// Note: We use std HashMap here for PyO3 interface compatibility

/// Number of weekday slots in the occurrence mask (Monday..Friday).
pub const WEEKDAY_COUNT: u32 = 5;

/// Weekly occurrence mask: bit 1 = Monday .. bit 5 = Friday, bit 0 unused.
pub type WeeklyMask = i32;

/// Mask bit for a 1-based weekday index.
#[inline]
pub fn day_bit(day_index: u32) -> WeeklyMask {
    1 << day_index
}

/// Iterate the 1-based weekday indices set in `mask`, Monday first.
pub fn active_days(mask: WeeklyMask) -> impl Iterator<Item = u32> {
    (1..=WEEKDAY_COUNT).filter(move |&d| mask & day_bit(d) != 0)
}

/// A personal calendar event.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub title: String,
    #[pyo3(get, set)]
    #[serde(rename = "startTime")]
    pub start_time: PackedTime,
    #[pyo3(get, set)]
    #[serde(rename = "endTime")]
    pub end_time: PackedTime,
    #[pyo3(get, set)]
    pub day: WeeklyMask,
    #[pyo3(get, set)]
    pub professor: String,
    #[pyo3(get, set)]
    pub description: String,
}

impl Event {
    /// True when either end of the event carries a "no time" sentinel.
    pub fn is_untimed(&self) -> bool {
        time::is_untimed(self.start_time) || time::is_untimed(self.end_time)
    }

    /// Build an event from a creation payload and an assigned id.
    pub fn from_new(id: String, new_event: NewEvent) -> Self {
        Self {
            id,
            title: new_event.title,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            day: new_event.day,
            professor: new_event.professor,
            description: new_event.description,
        }
    }
}

#[pymethods]
impl Event {
    #[new]
    #[pyo3(signature = (id, title, start_time, end_time, day, professor=String::new(), description=String::new()))]
    fn new(
        id: String,
        title: String,
        start_time: PackedTime,
        end_time: PackedTime,
        day: WeeklyMask,
        professor: String,
        description: String,
    ) -> Self {
        Self {
            id,
            title,
            start_time,
            end_time,
            day,
            professor,
            description,
        }
    }

    /// Start as a time of day, `None` when untimed or malformed.
    fn start_time_of_day(&self) -> Option<NaiveTime> {
        time::to_time_of_day(self.start_time)
    }

    /// End as a time of day, `None` when untimed or malformed.
    fn end_time_of_day(&self) -> Option<NaiveTime> {
        time::to_time_of_day(self.end_time)
    }

    fn __repr__(&self) -> String {
        format!(
            "Event(id={:?}, title={:?}, start={}, end={}, day={:#b})",
            self.id, self.title, self.start_time, self.end_time, self.day
        )
    }
}

/// Payload for creating an event; the backend assigns the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start_time: PackedTime,
    pub end_time: PackedTime,
    pub day: WeeklyMask,
    pub professor: String,
    pub description: String,
}

/// An event with its grid geometry for one day.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionedEvent {
    #[pyo3(get)]
    #[serde(flatten)]
    pub event: Event,
    #[pyo3(get)]
    #[serde(rename = "startTimeFormatted")]
    pub start_time_formatted: String,
    #[pyo3(get)]
    #[serde(rename = "endTimeFormatted")]
    pub end_time_formatted: String,
    /// Column width within the collision group
    #[pyo3(get)]
    pub width: String,
    /// Column offset within the collision group
    #[pyo3(get)]
    pub left: String,
    #[pyo3(get)]
    #[serde(rename = "topPosition")]
    pub top_position: String,
    #[pyo3(get)]
    #[serde(rename = "heightPosition")]
    pub height_position: String,
}

#[pymethods]
impl PositionedEvent {
    fn __repr__(&self) -> String {
        format!(
            "PositionedEvent(id={:?}, top={}, height={}, left={}, width={})",
            self.event.id, self.top_position, self.height_position, self.left, self.width
        )
    }
}

/// Laid-out week: timed events with geometry and untimed events, keyed by day "1".."5".
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekLayout {
    #[pyo3(get)]
    #[serde(rename = "eventsByDay")]
    pub events_by_day: HashMap<String, Vec<PositionedEvent>>,
    #[pyo3(get)]
    #[serde(rename = "noTimeEventsByDay")]
    pub no_time_events_by_day: HashMap<String, Vec<Event>>,
}

#[pymethods]
impl WeekLayout {
    fn __repr__(&self) -> String {
        format!(
            "WeekLayout(timed_days={}, untimed_days={})",
            self.events_by_day.len(),
            self.no_time_events_by_day.len()
        )
    }
}

/// A course parameter for schedule generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassParam {
    pub id: String,
    pub code: String,
    pub name: String,
    pub section: String,
    pub instructor: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_days() {
        let days: Vec<u32> = active_days(0b000110).collect();
        assert_eq!(days, vec![1, 2]);

        // bit 0 and bits above Friday are ignored
        let days: Vec<u32> = active_days(0b11000001).collect();
        assert!(days.is_empty());
    }

    #[test]
    fn test_event_wire_names() {
        let event = Event {
            id: "e1".to_string(),
            title: "Lab".to_string(),
            start_time: 900,
            end_time: 1000,
            day: 2,
            professor: String::new(),
            description: String::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["startTime"], 900);
        assert_eq!(json["endTime"], 1000);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_new_event_wire_names_are_snake_case() {
        let new_event = NewEvent {
            title: "Lab".to_string(),
            start_time: 900,
            end_time: 1000,
            day: 2,
            professor: String::new(),
            description: String::new(),
        };
        let json = serde_json::to_value(&new_event).unwrap();
        assert_eq!(json["start_time"], 900);
        assert_eq!(json["end_time"], 1000);
        assert!(json.get("startTime").is_none());
    }
}
