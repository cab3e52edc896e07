//! Configuration types for the calendar engine.

use pyo3::prelude::*;

/// Visible window and logging configuration for the weekly grid.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarConfig {
    /// First hour shown on the grid (inclusive)
    #[pyo3(get, set)]
    pub start_hour: i32,
    /// Last hour shown on the grid (exclusive)
    #[pyo3(get, set)]
    pub end_hour: i32,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 20,
            verbosity: 0,
        }
    }
}

impl CalendarConfig {
    /// Build a config for the given visible window with logging off.
    pub fn with_window(start_hour: i32, end_hour: i32) -> Self {
        Self {
            start_hour,
            end_hour,
            ..Self::default()
        }
    }

    /// Minute of day at which the visible window starts.
    pub fn window_start_minutes(&self) -> i32 {
        self.start_hour * 60
    }

    /// Total minutes shown on the grid.
    ///
    /// Never less than 1 so percentages stay finite for a degenerate window.
    pub fn visible_minutes(&self) -> i32 {
        ((self.end_hour - self.start_hour) * 60).max(1)
    }
}

#[pymethods]
impl CalendarConfig {
    #[new]
    #[pyo3(signature = (start_hour=None, end_hour=None, verbosity=None))]
    fn new(start_hour: Option<i32>, end_hour: Option<i32>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            start_hour: start_hour.unwrap_or(defaults.start_hour),
            end_hour: end_hour.unwrap_or(defaults.end_hour),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CalendarConfig(start_hour={}, end_hour={}, verbosity={})",
            self.start_hour, self.end_hour, self.verbosity
        )
    }
}
