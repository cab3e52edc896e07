//! Optimistic apply / remote call / rollback protocol.

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;

use crate::models::{ClassParam, Event};
use crate::validation::ValidationError;
use crate::{log_changes, log_checks, log_error};

/// Errors surfaced by a mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("No item with id {0}")]
    NotFound(String),
    #[error("Remote command failed: {0}")]
    Remote(String),
    #[error("Unexpected response from backend: {0}")]
    UnexpectedShape(String),
}

/// Severity of a user-visible status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Status line shown to the user after a mutation or refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Result of a mutation guarded by a confirmation gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome<R> {
    Applied(R),
    /// The user said no; nothing changed locally or remotely.
    Declined,
}

/// Records addressable by a string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Event {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ClassParam {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A local change to a keyed collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change<T> {
    Create(T),
    Update(T),
    Delete(String),
}

impl<T: Keyed> Change<T> {
    fn describe(&self) -> String {
        match self {
            Self::Create(item) => format!("create {}", item.key()),
            Self::Update(item) => format!("update {}", item.key()),
            Self::Delete(key) => format!("delete {}", key),
        }
    }

    /// Apply to `items`. Leaves `items` untouched on error.
    pub fn apply(self, items: &mut Vec<T>) -> Result<(), MutationError> {
        match self {
            Self::Create(item) => items.push(item),
            Self::Update(item) => {
                let slot = items
                    .iter_mut()
                    .find(|existing| existing.key() == item.key())
                    .ok_or_else(|| MutationError::NotFound(item.key().to_string()))?;
                *slot = item;
            }
            Self::Delete(key) => {
                let index = items
                    .iter()
                    .position(|existing| existing.key() == key)
                    .ok_or(MutationError::NotFound(key))?;
                items.remove(index);
            }
        }
        Ok(())
    }
}

/// Runs every mutation through snapshot, local apply, remote call and
/// (on failure) rollback, and keeps the resulting status line.
///
/// Mutations borrow the controller and the state mutably until the remote
/// call settles, so at most one is in flight per owner.
#[derive(Debug, Clone, Default)]
pub struct MutationController {
    verbosity: u8,
    status: Option<StatusMessage>,
}

impl MutationController {
    pub fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            status: None,
        }
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Record `err` as the user-visible status.
    pub fn report(&mut self, err: &MutationError) {
        log_error!("{}", err);
        self.status = Some(StatusMessage::error(err.to_string()));
    }

    /// Apply `local` to `state`, then await `remote`.
    ///
    /// On remote failure `state` is restored to the exact pre-change
    /// snapshot. If `local` itself fails, `remote` is dropped without ever
    /// being polled.
    pub async fn run<S, R, E, Fut>(
        &mut self,
        label: &str,
        state: &mut S,
        local: impl FnOnce(&mut S) -> Result<(), MutationError>,
        remote: Fut,
    ) -> Result<R, MutationError>
    where
        S: Clone,
        E: Display,
        Fut: Future<Output = Result<R, E>>,
    {
        let snapshot = state.clone();

        if let Err(err) = local(state) {
            *state = snapshot;
            log_checks!(self.verbosity, "Rejected {} before remote call: {}", label, err);
            self.report(&err);
            return Err(err);
        }
        log_changes!(self.verbosity, "Applied {} locally", label);

        match remote.await {
            Ok(value) => {
                log_changes!(self.verbosity, "Confirmed {}", label);
                self.status = None;
                Ok(value)
            }
            Err(remote_err) => {
                *state = snapshot;
                log_changes!(self.verbosity, "Rolled back {}", label);
                let err = MutationError::Remote(remote_err.to_string());
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Optimistically apply a keyed `change` to `items`.
    pub async fn apply<T, R, E, Fut>(
        &mut self,
        items: &mut Vec<T>,
        change: Change<T>,
        remote: Fut,
    ) -> Result<R, MutationError>
    where
        T: Keyed + Clone,
        E: Display,
        Fut: Future<Output = Result<R, E>>,
    {
        let label = change.describe();
        self.run(&label, items, |items| change.apply(items), remote)
            .await
    }

    /// Ask `confirm` first; a "no" aborts without any change or error.
    pub async fn run_confirmed<S, R, E, Fut>(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
        prompt: &str,
        state: &mut S,
        local: impl FnOnce(&mut S) -> Result<(), MutationError>,
        remote: Fut,
    ) -> Result<MutationOutcome<R>, MutationError>
    where
        S: Clone,
        E: Display,
        Fut: Future<Output = Result<R, E>>,
    {
        if !confirm(prompt) {
            log_checks!(self.verbosity, "Declined: {}", prompt);
            return Ok(MutationOutcome::Declined);
        }
        self.run(prompt, state, local, remote)
            .await
            .map(MutationOutcome::Applied)
    }
}
