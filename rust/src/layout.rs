//! Overlap resolution and grid geometry for one day of timed events.
//!
//! Events are grouped greedily: walking in start-time order, an event joins
//! the current collision group when it starts before the end of *any*
//! member already in the group. This chains events into temporally
//! contiguous clusters rather than computing a true interval-graph
//! colouring, and every member of a group of `k` gets a `1/k` column.

use std::collections::HashMap;

use crate::config::CalendarConfig;
use crate::decoder::decode;
use crate::log_debug;
use crate::models::{Event, PositionedEvent, WeekLayout};
use crate::time::{format_packed, minutes_of_day};

/// Format a percentage with at most two decimals and no trailing zeros.
///
/// `50.0` -> "50%", `33.333` -> "33.33%", `12.5` -> "12.5%".
pub fn format_percent(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        return "0%".to_string();
    }
    format!("{}%", text)
}

/// Start and end of an event in minutes since the window opens.
///
/// `None` when either end is not a real time of day.
fn window_span(event: &Event, config: &CalendarConfig) -> Option<(i32, i32)> {
    let start = minutes_of_day(event.start_time)?;
    let end = minutes_of_day(event.end_time)?;
    let offset = config.window_start_minutes();
    Some((start - offset, end - offset))
}

/// Partition well-formed spans (already sorted by start) into collision
/// groups of indices. Events without a span never join a group.
fn collision_groups(spans: &[Option<(i32, i32)>]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for (i, span) in spans.iter().enumerate() {
        let Some((start, _)) = *span else {
            continue;
        };
        let overlaps_group = current
            .iter()
            .any(|&member| spans[member].is_some_and(|(_, end)| start < end));

        if !overlaps_group && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
        current.push(i);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Lay out one day's timed events.
///
/// Output is in start-time order (stable for ties). Never panics on
/// malformed times; those events get zero position and zero height and a
/// full-width column of their own, leaving valid events untouched.
pub fn layout(day_events: &[Event], config: &CalendarConfig) -> Vec<PositionedEvent> {
    let mut sorted: Vec<Event> = day_events.to_vec();
    sorted.sort_by_key(|e| e.start_time);

    let spans: Vec<Option<(i32, i32)>> = sorted.iter().map(|e| window_span(e, config)).collect();
    let groups = collision_groups(&spans);
    let total = config.visible_minutes() as f64;

    let mut columns: Vec<(f64, f64)> = vec![(100.0, 0.0); sorted.len()];
    for group in &groups {
        let width = 100.0 / group.len() as f64;
        log_debug!(
            config.verbosity,
            "collision group of {} starting at {}",
            group.len(),
            sorted[group[0]].id
        );
        for (index, &member) in group.iter().enumerate() {
            columns[member] = (width, index as f64 * width);
        }
    }

    sorted
        .into_iter()
        .zip(spans)
        .zip(columns)
        .map(|((event, span), (width, left))| {
            let (start, end) = span.unwrap_or((0, 0));
            let duration = (end - start).max(0);
            PositionedEvent {
                start_time_formatted: format_packed(event.start_time),
                end_time_formatted: format_packed(event.end_time),
                width: format_percent(width),
                left: format_percent(left),
                top_position: format_percent(start as f64 / total * 100.0),
                height_position: format_percent(duration as f64 / total * 100.0),
                event,
            }
        })
        .collect()
}

/// Decode events into day buckets and lay out every day's timed list.
pub fn process_events(events: &[Event], config: &CalendarConfig) -> WeekLayout {
    let week = decode(events);

    let events_by_day: HashMap<String, Vec<PositionedEvent>> = week
        .by_day
        .into_iter()
        .map(|(day, day_events)| {
            let positioned = layout(&day_events, config);
            (day, positioned)
        })
        .collect();

    WeekLayout {
        events_by_day,
        no_time_events_by_day: week.untimed_by_day,
    }
}
