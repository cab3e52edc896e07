//! Rust implementation of the schedgrid calendar engine.
//!
//! This module provides the weekly layout, schedule identity and optimistic
//! mutation machinery behind the calendar view.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde_json::Value;

pub mod backend;
pub mod busy;
mod config;
pub mod courses;
pub mod decoder;
pub mod identity;
pub mod layout;
pub mod logging;
mod models;
pub mod mutation;
pub mod session;
pub mod time;
pub mod validation;

pub use backend::{GenerateRequest, ScheduleBackend};
pub use config::CalendarConfig;
pub use decoder::{decode, DecodedWeek};
pub use identity::{DisplayNumber, FavoriteIndex, ScheduleRegistry};
pub use models::{ClassParam, Event, NewEvent, PositionedEvent, WeekLayout};
pub use mutation::{MutationController, MutationError, StatusKind, StatusMessage};
pub use session::Session;

fn parse_json(input: &str) -> PyResult<Value> {
    serde_json::from_str(input).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Lay out a week of events for the calendar grid.
///
/// # Arguments
/// * `events` - Events to place; timed events are positioned, untimed ones are bucketed per day
/// * `config` - Visible window and verbosity (defaults to 08:00-20:00, silent)
///
/// # Returns
/// * WeekLayout keyed by day ("1" = Monday .. "5" = Friday)
#[pyfunction]
#[pyo3(name = "process_events", signature = (events, config=None))]
fn py_process_events(events: Vec<Event>, config: Option<CalendarConfig>) -> WeekLayout {
    layout::process_events(&events, &config.unwrap_or_default())
}

/// Canonical identity key of a schedule given as JSON text.
///
/// # Raises
/// * ValueError if the text is not valid JSON
#[pyfunction]
#[pyo3(name = "canonical_key")]
fn py_canonical_key(schedule_json: &str) -> PyResult<Option<String>> {
    let schedule = parse_json(schedule_json)?;
    Ok(identity::canonical_key(&schedule))
}

/// Busy intervals of timed events, as `((start, end), [mon..fri])` tuples.
#[pyfunction]
#[pyo3(name = "busy_times")]
fn py_busy_times(events: Vec<Event>) -> Vec<((i32, i32), Vec<bool>)> {
    busy::busy_times(&events)
        .into_iter()
        .map(|busy| (busy.time, busy.days.to_vec()))
        .collect()
}

/// Grid events for a candidate schedule given as JSON text.
///
/// # Raises
/// * ValueError if the text is not a list of courses
#[pyfunction]
#[pyo3(name = "schedule_events")]
fn py_schedule_events(schedule_json: &str) -> PyResult<Vec<Event>> {
    let schedule = parse_json(schedule_json)?;
    let courses =
        courses::parse_schedule(&schedule).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(courses::schedule_events(&courses))
}

/// Format a packed HHMM time as "HH:MM".
#[pyfunction]
fn format_time(packed: i32) -> String {
    time::format_packed(packed)
}

/// Parse "HH:MM" into a packed time; empty input is untimed.
///
/// # Raises
/// * ValueError if the text is not a valid time
#[pyfunction]
#[pyo3(signature = (text, field="time"))]
fn parse_time(text: &str, field: &str) -> PyResult<i32> {
    time::parse_packed(field, text).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Display-number registry (PyO3 wrapper).
///
/// Schedules cross the boundary as JSON text.
#[pyclass(name = "ScheduleRegistry")]
#[derive(Clone, Debug, Default)]
pub struct PyScheduleRegistry {
    inner: ScheduleRegistry,
}

#[pymethods]
impl PyScheduleRegistry {
    #[new]
    #[pyo3(signature = (verbosity=0))]
    fn new(verbosity: u8) -> Self {
        Self {
            inner: ScheduleRegistry::new(verbosity),
        }
    }

    /// Number any unseen schedules; returns how many were new.
    ///
    /// # Raises
    /// * ValueError if an entry is not valid JSON
    fn assign_numbers(&mut self, schedules_json: Vec<String>) -> PyResult<usize> {
        let schedules = schedules_json
            .iter()
            .map(|text| parse_json(text))
            .collect::<PyResult<Vec<Value>>>()?;
        Ok(self.inner.assign_numbers(&schedules))
    }

    /// Display number for a canonical key, or "?".
    fn number_of(&self, key: &str) -> String {
        self.inner.number_of(key).to_string()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleRegistry(assigned={}, next={})",
            self.inner.len(),
            self.inner.next_number()
        )
    }
}

/// The schedgrid.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Event>()?;
    m.add_class::<PositionedEvent>()?;
    m.add_class::<WeekLayout>()?;
    m.add_class::<PyScheduleRegistry>()?;

    // Config types
    m.add_class::<CalendarConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_process_events, m)?)?;
    m.add_function(wrap_pyfunction!(py_canonical_key, m)?)?;
    m.add_function(wrap_pyfunction!(py_busy_times, m)?)?;
    m.add_function(wrap_pyfunction!(py_schedule_events, m)?)?;
    m.add_function(wrap_pyfunction!(format_time, m)?)?;
    m.add_function(wrap_pyfunction!(parse_time, m)?)?;

    Ok(())
}
