//! Session state: personal events, candidate schedules and course
//! parameters, kept in sync with the backend through optimistic mutations.

use serde_json::Value;

use crate::backend::{GenerateRequest, ScheduleBackend};
use crate::busy::busy_times;
use crate::config::CalendarConfig;
use crate::courses::{parse_schedule, schedule_events};
use crate::identity::{canonical_key, DisplayNumber, FavoriteIndex, ScheduleRegistry};
use crate::layout::process_events;
use crate::models::{ClassParam, Event, NewEvent, WeekLayout};
use crate::mutation::{
    BlurOutcome, Change, FieldEdit, MutationController, MutationError, MutationOutcome,
    StatusMessage,
};
use crate::validation::Validate;
use crate::{log_changes, log_checks, log_error};

/// An opaque schedule paired with its canonical key, computed once on arrival.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedSchedule {
    pub key: String,
    pub schedule: Value,
}

impl KeyedSchedule {
    /// `None` when the schedule has no canonical key.
    pub fn new(schedule: Value) -> Option<Self> {
        canonical_key(&schedule).map(|key| Self { key, schedule })
    }
}

/// Key every schedule, dropping those that cannot be keyed.
fn keyed(schedules: Vec<Value>) -> Vec<KeyedSchedule> {
    schedules.into_iter().filter_map(KeyedSchedule::new).collect()
}

fn keys_of(list: &[KeyedSchedule]) -> impl Iterator<Item = String> + '_ {
    list.iter().map(|entry| entry.key.clone())
}

/// Candidate schedules, favorites and the current selection.
///
/// Snapshotted as a unit by favorite and delete mutations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateState {
    pub schedules: Vec<KeyedSchedule>,
    pub favorites: Vec<KeyedSchedule>,
    /// Canonical key of the schedule overlaid on the grid.
    pub selected: Option<String>,
}

/// One row of the candidate list as the view renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateRow {
    pub key: String,
    pub number: DisplayNumber,
    pub favorite: bool,
}

fn remove_by_key(list: &mut Vec<KeyedSchedule>, key: &str) {
    list.retain(|entry| entry.key != key);
}

/// Owns every piece of state the calendar view reads.
///
/// The display-number registry lives here rather than in a global; it is
/// reset only by [`generate`](Session::generate).
pub struct Session<B: ScheduleBackend> {
    backend: B,
    config: CalendarConfig,
    events: Vec<Event>,
    class_params: Vec<ClassParam>,
    candidates: CandidateState,
    registry: ScheduleRegistry,
    favorite_index: FavoriteIndex,
    controller: MutationController,
    pending_ids: u32,
}

impl<B: ScheduleBackend> Session<B> {
    pub fn new(backend: B, config: CalendarConfig) -> Self {
        let verbosity = config.verbosity;
        Self {
            backend,
            config,
            events: Vec::new(),
            class_params: Vec::new(),
            candidates: CandidateState::default(),
            registry: ScheduleRegistry::new(verbosity),
            favorite_index: FavoriteIndex::default(),
            controller: MutationController::new(verbosity),
            pending_ids: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn class_params(&self) -> &[ClassParam] {
        &self.class_params
    }

    pub fn candidates(&self) -> &CandidateState {
        &self.candidates
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.controller.status()
    }

    fn remote_error(&mut self, err: impl std::fmt::Display) -> MutationError {
        let err = MutationError::Remote(err.to_string());
        self.controller.report(&err);
        err
    }

    // --- events ---

    /// Replace local events with the backend's list.
    pub async fn refresh_events(&mut self) -> Result<(), MutationError> {
        match self.backend.fetch_events().await {
            Ok(events) => {
                log_changes!(self.config.verbosity, "Loaded {} events", events.len());
                self.events = events;
                Ok(())
            }
            Err(err) => Err(self.remote_error(err)),
        }
    }

    /// Create an event.
    ///
    /// A placeholder with a pending id is shown immediately. The backend does
    /// not echo the stored event, so a successful create is followed by a
    /// full refresh that replaces the placeholder. If that refresh fails the
    /// placeholder is dropped; its id was never issued by the backend.
    pub async fn create_event(&mut self, new_event: NewEvent) -> Result<(), MutationError> {
        self.pending_ids += 1;
        let placeholder_id = format!("pending-{}", self.pending_ids);
        let placeholder = Event::from_new(placeholder_id.clone(), new_event.clone());
        placeholder.validate()?;

        self.controller
            .apply(
                &mut self.events,
                Change::Create(placeholder),
                self.backend.create_event(new_event),
            )
            .await?;

        if let Err(err) = self.refresh_events().await {
            self.events.retain(|e| e.id != placeholder_id);
            return Err(err);
        }
        Ok(())
    }

    pub async fn update_event(&mut self, event: Event) -> Result<(), MutationError> {
        event.validate()?;
        let remote = self.backend.update_event(event.clone());
        self.controller
            .apply(&mut self.events, Change::Update(event), remote)
            .await
    }

    /// Delete an event after `confirm` agrees.
    pub async fn delete_event(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<MutationOutcome<()>, MutationError> {
        let title = self
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.clone())
            .ok_or_else(|| MutationError::NotFound(id.to_string()))?;
        let prompt = format!("Delete event '{}'?", title);
        let change = Change::Delete(id.to_string());

        self.controller
            .run_confirmed(
                confirm,
                &prompt,
                &mut self.events,
                |events| change.apply(events),
                self.backend.delete_event(id),
            )
            .await
    }

    /// Commit a field edit when the form loses focus.
    pub async fn commit_event_edit(
        &mut self,
        edit: &mut FieldEdit<Event>,
    ) -> Result<BlurOutcome<Event>, MutationError> {
        match edit.on_blur() {
            BlurOutcome::Commit(event) => match self.update_event(event.clone()).await {
                Ok(()) => {
                    edit.mark_committed();
                    Ok(BlurOutcome::Commit(event))
                }
                Err(err) => {
                    edit.revert();
                    Err(err)
                }
            },
            BlurOutcome::Reverted(err) => {
                log_checks!(self.config.verbosity, "Discarded event edit: {}", err);
                Ok(BlurOutcome::Reverted(err))
            }
            BlurOutcome::Unchanged => Ok(BlurOutcome::Unchanged),
        }
    }

    // --- candidate schedules ---

    fn rebuild_favorite_index(&mut self) {
        self.favorite_index
            .rebuild_from_keys(keys_of(&self.candidates.favorites));
    }

    /// Reload candidates and favorites. Existing numbers are kept.
    pub async fn refresh_schedules(&mut self) -> Result<(), MutationError> {
        let schedules = match self.backend.fetch_schedules().await {
            Ok(schedules) => schedules,
            Err(err) => return Err(self.remote_error(err)),
        };
        let favorites = match self.backend.fetch_favorites().await {
            Ok(favorites) => favorites,
            Err(err) => return Err(self.remote_error(err)),
        };

        let schedules = keyed(schedules);
        let favorites = keyed(favorites);
        self.registry.assign_keys(keys_of(&schedules));
        self.registry.assign_keys(keys_of(&favorites));
        self.candidates.schedules = schedules;
        self.candidates.favorites = favorites;
        self.rebuild_favorite_index();

        if let Some(selected) = self.candidates.selected.clone() {
            if self.find_schedule(&selected).is_none() {
                self.candidates.selected = None;
            }
        }
        log_changes!(
            self.config.verbosity,
            "Loaded {} schedules, {} favorites",
            self.candidates.schedules.len(),
            self.candidates.favorites.len()
        );
        Ok(())
    }

    /// Run a new generation. Numbering restarts from 1 on success.
    ///
    /// Returns the number of candidate schedules received.
    pub async fn generate(&mut self, options: [bool; 3]) -> Result<usize, MutationError> {
        let request = GenerateRequest {
            params_checkbox: options,
            classes: self.class_params.clone(),
            events: busy_times(&self.events),
        };

        let response = match self.backend.generate_schedules(request).await {
            Ok(response) => response,
            Err(err) => return Err(self.remote_error(err)),
        };

        match response {
            Value::Array(schedules) => {
                let schedules = keyed(schedules);
                self.registry.reset();
                self.registry.assign_keys(keys_of(&schedules));
                self.registry.assign_keys(keys_of(&self.candidates.favorites));
                let count = schedules.len();
                self.candidates.schedules = schedules;
                self.candidates.selected = None;
                self.controller
                    .set_status(StatusMessage::info(format!("Generated {} schedules", count)));
                Ok(count)
            }
            Value::String(message) => Err(self.remote_error(message)),
            other => {
                self.candidates.schedules.clear();
                self.candidates.selected = None;
                let kind = match other {
                    Value::Null => "null",
                    Value::Bool(_) => "boolean",
                    Value::Number(_) => "number",
                    _ => "object",
                };
                let err = MutationError::UnexpectedShape(format!(
                    "expected a list of schedules, got {}",
                    kind
                ));
                self.controller.report(&err);
                Err(err)
            }
        }
    }

    fn find_entry(&self, key: &str) -> Option<&KeyedSchedule> {
        self.candidates
            .schedules
            .iter()
            .chain(self.candidates.favorites.iter())
            .find(|entry| entry.key == key)
    }

    /// Look up a candidate or favorite by canonical key.
    pub fn find_schedule(&self, key: &str) -> Option<&Value> {
        self.find_entry(key).map(|entry| &entry.schedule)
    }

    pub fn number_of(&self, key: &str) -> DisplayNumber {
        self.registry.number_of(key)
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorite_index.contains(key)
    }

    /// Candidate rows in list order.
    pub fn candidate_rows(&self) -> Vec<CandidateRow> {
        self.candidates
            .schedules
            .iter()
            .map(|entry| CandidateRow {
                key: entry.key.clone(),
                number: self.registry.number_of(&entry.key),
                favorite: self.favorite_index.contains(&entry.key),
            })
            .collect()
    }

    /// Select the schedule overlaid on the grid. Unknown keys are ignored.
    pub fn select_schedule(&mut self, key: Option<&str>) -> bool {
        match key {
            Some(key) if self.find_schedule(key).is_some() => {
                self.candidates.selected = Some(key.to_string());
                true
            }
            Some(key) => {
                log_checks!(self.config.verbosity, "Ignoring selection of unknown schedule {}", key);
                false
            }
            None => {
                self.candidates.selected = None;
                true
            }
        }
    }

    pub fn selected_schedule(&self) -> Option<&Value> {
        self.candidates
            .selected
            .as_deref()
            .and_then(|key| self.find_schedule(key))
    }

    /// Flip favorite status. Returns the new status.
    pub async fn toggle_favorite(&mut self, key: &str) -> Result<bool, MutationError> {
        let entry = self
            .find_entry(key)
            .cloned()
            .ok_or_else(|| MutationError::NotFound(key.to_string()))?;
        let favorite = !self.is_favorite(key);
        let action = if favorite { "favorite" } else { "unfavorite" };
        let label = format!("{} schedule {}", action, self.number_of(key));

        let remote = self
            .backend
            .set_favorite(key, favorite, favorite.then(|| entry.schedule.clone()));
        let result = self
            .controller
            .run(
                &label,
                &mut self.candidates,
                |state| {
                    if favorite {
                        state.favorites.push(entry);
                    } else {
                        remove_by_key(&mut state.favorites, key);
                    }
                    Ok(())
                },
                remote,
            )
            .await;

        self.rebuild_favorite_index();
        result.map(|()| favorite)
    }

    /// Delete a candidate schedule (and its favorite entry) after `confirm`.
    ///
    /// Display numbers of the remaining schedules do not change.
    pub async fn delete_schedule(
        &mut self,
        key: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<MutationOutcome<()>, MutationError> {
        if self.find_entry(key).is_none() {
            return Err(MutationError::NotFound(key.to_string()));
        }
        let was_favorite = self.is_favorite(key);
        let prompt = format!("Delete schedule {}?", self.number_of(key));

        let remote = self.backend.delete_schedule(key, was_favorite);
        let outcome = self
            .controller
            .run_confirmed(
                confirm,
                &prompt,
                &mut self.candidates,
                |state| {
                    remove_by_key(&mut state.schedules, key);
                    remove_by_key(&mut state.favorites, key);
                    if state.selected.as_deref() == Some(key) {
                        state.selected = None;
                    }
                    Ok(())
                },
                remote,
            )
            .await;

        self.rebuild_favorite_index();
        outcome
    }

    // --- course parameters ---

    pub async fn refresh_class_params(&mut self) -> Result<(), MutationError> {
        match self.backend.fetch_class_params().await {
            Ok(params) => {
                self.class_params = params;
                Ok(())
            }
            Err(err) => Err(self.remote_error(err)),
        }
    }

    pub async fn update_class_param(&mut self, param: ClassParam) -> Result<(), MutationError> {
        param.validate()?;
        let remote = self.backend.update_class_param(param.clone());
        self.controller
            .apply(&mut self.class_params, Change::Update(param), remote)
            .await
    }

    pub async fn delete_class_param(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<MutationOutcome<()>, MutationError> {
        let code = self
            .class_params
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.code.clone())
            .ok_or_else(|| MutationError::NotFound(id.to_string()))?;
        let prompt = format!("Remove course {}?", code);
        let change = Change::Delete(id.to_string());

        self.controller
            .run_confirmed(
                confirm,
                &prompt,
                &mut self.class_params,
                |params| change.apply(params),
                self.backend.delete_class_param(id),
            )
            .await
    }

    pub async fn commit_class_param_edit(
        &mut self,
        edit: &mut FieldEdit<ClassParam>,
    ) -> Result<BlurOutcome<ClassParam>, MutationError> {
        match edit.on_blur() {
            BlurOutcome::Commit(param) => match self.update_class_param(param.clone()).await {
                Ok(()) => {
                    edit.mark_committed();
                    Ok(BlurOutcome::Commit(param))
                }
                Err(err) => {
                    edit.revert();
                    Err(err)
                }
            },
            BlurOutcome::Reverted(err) => {
                log_checks!(self.config.verbosity, "Discarded course edit: {}", err);
                Ok(BlurOutcome::Reverted(err))
            }
            BlurOutcome::Unchanged => Ok(BlurOutcome::Unchanged),
        }
    }

    // --- rendering ---

    /// Personal events plus the selected schedule, laid out for the grid.
    pub fn week_layout(&self) -> WeekLayout {
        let mut events = self.events.clone();
        if let Some(schedule) = self.selected_schedule() {
            match parse_schedule(schedule) {
                Ok(courses) => events.extend(schedule_events(&courses)),
                Err(err) => log_error!("Selected schedule is not a course list: {}", err),
            }
        }
        process_events(&events, &self.config)
    }
}
