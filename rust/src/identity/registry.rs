//! Stable display numbers for candidate schedules.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::log_changes;

use super::canonical::canonical_key;

/// Display number for a schedule key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayNumber {
    Assigned(u32),
    /// Key has not been seen since the last reset.
    Unknown,
}

impl std::fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned(n) => write!(f, "{}", n),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// First-seen numbering of canonical schedule keys.
///
/// Numbers never change while the registry lives; only [`reset`] (a new
/// generation run) starts over from 1.
///
/// [`reset`]: ScheduleRegistry::reset
#[derive(Debug, Clone)]
pub struct ScheduleRegistry {
    numbers: FxHashMap<String, u32>,
    next_number: u32,
    verbosity: u8,
}

impl ScheduleRegistry {
    pub fn new(verbosity: u8) -> Self {
        Self {
            numbers: FxHashMap::default(),
            next_number: 1,
            verbosity,
        }
    }

    /// Number every unseen schedule in list order. Returns how many were new.
    ///
    /// Schedules without a canonical key are skipped.
    pub fn assign_numbers<S: Serialize>(&mut self, schedules: &[S]) -> usize {
        self.assign_keys(schedules.iter().filter_map(|s| canonical_key(s)))
    }

    /// Number already-computed keys in order. Returns how many were new.
    pub fn assign_keys(&mut self, keys: impl IntoIterator<Item = String>) -> usize {
        let before = self.numbers.len();
        for key in keys {
            self.assign_key(key);
        }
        self.numbers.len() - before
    }

    /// Number a single key if unseen; returns its (possibly existing) number.
    pub fn assign_key(&mut self, key: String) -> u32 {
        if let Some(&number) = self.numbers.get(&key) {
            return number;
        }
        let number = self.next_number;
        self.numbers.insert(key, number);
        self.next_number += 1;
        number
    }

    #[inline]
    pub fn number_of(&self, key: &str) -> DisplayNumber {
        match self.numbers.get(key) {
            Some(&n) => DisplayNumber::Assigned(n),
            None => DisplayNumber::Unknown,
        }
    }

    /// Forget every number and restart at 1.
    pub fn reset(&mut self) {
        log_changes!(
            self.verbosity,
            "Resetting schedule numbering ({} keys dropped)",
            self.numbers.len()
        );
        self.numbers.clear();
        self.next_number = 1;
    }

    /// Number the next unseen key will receive.
    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl Default for ScheduleRegistry {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn schedules(codes: &[&str]) -> Vec<Value> {
        codes.iter().map(|c| json!([{ "code": c }])).collect()
    }

    fn key(code: &str) -> String {
        canonical_key(&json!([{ "code": code }])).unwrap()
    }

    #[test]
    fn test_numbers_in_first_seen_order() {
        let mut registry = ScheduleRegistry::default();
        assert_eq!(registry.assign_numbers(&schedules(&["a", "b", "c"])), 3);

        assert_eq!(registry.number_of(&key("a")), DisplayNumber::Assigned(1));
        assert_eq!(registry.number_of(&key("b")), DisplayNumber::Assigned(2));
        assert_eq!(registry.number_of(&key("c")), DisplayNumber::Assigned(3));
    }

    #[test]
    fn test_refresh_keeps_existing_numbers() {
        let mut registry = ScheduleRegistry::default();
        registry.assign_numbers(&schedules(&["a", "b"]));
        let before = registry.number_of(&key("b"));

        // Refreshed list in a different order plus a new schedule
        assert_eq!(registry.assign_numbers(&schedules(&["c", "b", "a"])), 1);

        assert_eq!(registry.number_of(&key("b")), before);
        assert_eq!(registry.number_of(&key("c")), DisplayNumber::Assigned(3));
    }

    #[test]
    fn test_duplicate_in_one_call_numbered_once() {
        let mut registry = ScheduleRegistry::default();
        assert_eq!(registry.assign_numbers(&schedules(&["a", "a"])), 1);
        assert_eq!(registry.next_number(), 2);
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut registry = ScheduleRegistry::default();
        registry.assign_numbers(&schedules(&["a", "b"]));
        registry.reset();

        assert!(registry.is_empty());
        assert_eq!(registry.number_of(&key("a")), DisplayNumber::Unknown);
        assert_eq!(registry.number_of(&key("a")).to_string(), "?");

        registry.assign_numbers(&schedules(&["z"]));
        assert_eq!(registry.number_of(&key("z")), DisplayNumber::Assigned(1));
        assert_eq!(registry.number_of(&key("a")), DisplayNumber::Unknown);

        registry.assign_numbers(&schedules(&["a"]));
        assert_eq!(registry.number_of(&key("a")), DisplayNumber::Assigned(2));
    }

    #[test]
    fn test_precomputed_keys_match_schedule_numbering() {
        let mut registry = ScheduleRegistry::default();
        assert_eq!(registry.assign_keys(vec![key("a"), key("b"), key("a")]), 2);

        assert_eq!(registry.assign_numbers(&schedules(&["b", "c"])), 1);
        assert_eq!(registry.number_of(&key("b")), DisplayNumber::Assigned(2));
        assert_eq!(registry.number_of(&key("c")), DisplayNumber::Assigned(3));
    }

    #[test]
    fn test_display_number_formatting() {
        assert_eq!(DisplayNumber::Assigned(7).to_string(), "7");
        assert_eq!(DisplayNumber::Unknown.to_string(), "?");
    }
}
