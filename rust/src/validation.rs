//! Field validation for events and course parameters.
//!
//! Validation runs before any state change; failures are reported against
//! the offending field and never reach the backend.

use thiserror::Error;

use crate::models::{day_bit, ClassParam, Event, WeeklyMask, WEEKDAY_COUNT};
use crate::time::{is_untimed, minutes_of_day, PackedTime};

/// A rejected field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Records that can be checked field by field.
pub trait Validate {
    /// Names of every field `validate_field` understands.
    fn fields() -> &'static [&'static str];

    /// Check a single field.
    fn validate_field(&self, field: &str) -> Result<(), ValidationError>;

    /// Check every field, returning the first failure.
    fn validate(&self) -> Result<(), ValidationError> {
        Self::fields()
            .iter()
            .try_for_each(|field| self.validate_field(field))
    }
}

/// Bits Monday..Friday.
fn weekday_bits() -> WeeklyMask {
    (1..=WEEKDAY_COUNT).fold(0, |mask, d| mask | day_bit(d))
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "title is required"));
    }
    Ok(())
}

pub fn validate_day_mask(day: WeeklyMask) -> Result<(), ValidationError> {
    if day == 0 {
        return Err(ValidationError::new("day", "select at least one day"));
    }
    if day & !weekday_bits() != 0 {
        return Err(ValidationError::new(
            "day",
            format!("mask {:#b} has bits outside Monday..Friday", day),
        ));
    }
    Ok(())
}

/// Both ends untimed, or both ends a real time of day.
pub fn validate_times(start: PackedTime, end: PackedTime) -> Result<(), ValidationError> {
    match (is_untimed(start), is_untimed(end)) {
        (true, true) => Ok(()),
        (true, false) => Err(ValidationError::new(
            "startTime",
            "start time is required when an end time is set",
        )),
        (false, true) => Err(ValidationError::new(
            "endTime",
            "end time is required when a start time is set",
        )),
        (false, false) => {
            if minutes_of_day(start).is_none() {
                return Err(ValidationError::new(
                    "startTime",
                    format!("{} is not a valid time", start),
                ));
            }
            if minutes_of_day(end).is_none() {
                return Err(ValidationError::new(
                    "endTime",
                    format!("{} is not a valid time", end),
                ));
            }
            Ok(())
        }
    }
}

impl Validate for Event {
    fn fields() -> &'static [&'static str] {
        &["title", "day", "startTime", "endTime"]
    }

    fn validate_field(&self, field: &str) -> Result<(), ValidationError> {
        match field {
            "title" => validate_title(&self.title),
            "day" => validate_day_mask(self.day),
            "startTime" | "endTime" => validate_times(self.start_time, self.end_time),
            _ => Ok(()),
        }
    }
}

impl Validate for ClassParam {
    fn fields() -> &'static [&'static str] {
        &["code"]
    }

    fn validate_field(&self, field: &str) -> Result<(), ValidationError> {
        match field {
            "code" if self.code.trim().is_empty() => {
                Err(ValidationError::new("code", "course code is required"))
            }
            _ => Ok(()),
        }
    }
}
