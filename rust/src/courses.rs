//! Typed view of a candidate schedule and its conversion to grid events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{day_bit, Event, WeeklyMask, WEEKDAY_COUNT};

/// One meeting pattern of a course section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub section: String,
    pub location: String,
    /// Monday..Friday: ((start, end), meets that day)
    pub days: [((i32, i32), bool); WEEKDAY_COUNT as usize],
    pub instructor: String,
}

/// A course as it appears inside a candidate schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub description: String,
    pub classes: Vec<TimeBlock>,
}

/// Read the opaque schedule value as a list of courses.
pub fn parse_schedule(schedule: &Value) -> Result<Vec<Course>, serde_json::Error> {
    Vec::<Course>::deserialize(schedule)
}

/// Turn every time block into grid events.
///
/// Days of a block that share the same (start, end) become one event with a
/// multi-day mask, so a MWF lecture is a single record.
pub fn schedule_events(courses: &[Course]) -> Vec<Event> {
    let mut events = Vec::new();

    for course in courses {
        for block in &course.classes {
            let mut patterns: Vec<((i32, i32), WeeklyMask)> = Vec::new();
            for (index, &(times, active)) in block.days.iter().enumerate() {
                if !active {
                    continue;
                }
                let bit = day_bit(index as u32 + 1);
                match patterns.iter_mut().find(|(t, _)| *t == times) {
                    Some((_, mask)) => *mask |= bit,
                    None => patterns.push((times, bit)),
                }
            }

            for (n, ((start, end), mask)) in patterns.into_iter().enumerate() {
                let description = if block.location.is_empty() {
                    course.name.clone()
                } else {
                    format!("{} ({})", course.name, block.location)
                };
                events.push(Event {
                    id: format!("{}-{}-{}", course.code, block.section, n),
                    title: course.code.clone(),
                    start_time: start,
                    end_time: end,
                    day: mask,
                    professor: block.instructor.clone(),
                    description,
                });
            }
        }
    }

    events
}
