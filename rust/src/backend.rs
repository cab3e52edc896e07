//! Interface to the persistence and schedule-generation backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::busy::BusyTime;
use crate::models::{ClassParam, Event, NewEvent};

/// Schedule generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Checkbox-style generator options.
    pub params_checkbox: [bool; 3],
    pub classes: Vec<ClassParam>,
    /// Times the generator must keep free.
    pub events: Vec<BusyTime>,
}

/// Commands the engine issues to the backend.
///
/// Candidate schedules are opaque JSON values; they are identified by their
/// canonical key. `generate_schedules` answers with a JSON string (an error
/// message) or a JSON array (the candidate schedules).
#[allow(async_fn_in_trait)]
pub trait ScheduleBackend {
    type Error: std::fmt::Display;

    async fn fetch_events(&self) -> Result<Vec<Event>, Self::Error>;
    /// Does not echo the created event; callers refresh afterwards.
    async fn create_event(&self, event: NewEvent) -> Result<(), Self::Error>;
    async fn update_event(&self, event: Event) -> Result<(), Self::Error>;
    async fn delete_event(&self, id: &str) -> Result<(), Self::Error>;

    async fn fetch_schedules(&self) -> Result<Vec<Value>, Self::Error>;
    async fn fetch_favorites(&self) -> Result<Vec<Value>, Self::Error>;
    async fn delete_schedule(&self, key: &str, was_favorite: bool) -> Result<(), Self::Error>;
    /// `schedule` is `Some` when adding a favorite.
    async fn set_favorite(
        &self,
        key: &str,
        favorite: bool,
        schedule: Option<Value>,
    ) -> Result<(), Self::Error>;

    async fn fetch_class_params(&self) -> Result<Vec<ClassParam>, Self::Error>;
    async fn update_class_param(&self, param: ClassParam) -> Result<(), Self::Error>;
    async fn delete_class_param(&self, id: &str) -> Result<(), Self::Error>;

    async fn generate_schedules(&self, request: GenerateRequest) -> Result<Value, Self::Error>;
}
