//! Field edits that commit on a blur boundary.

use rustc_hash::FxHashSet;

use crate::validation::{Validate, ValidationError};

/// What happened when the edited form lost focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlurOutcome<T> {
    /// Nothing was edited.
    Unchanged,
    /// Every modified field validates; this value should be committed.
    Commit(T),
    /// A modified field failed; the edit was discarded.
    Reverted(ValidationError),
}

/// Working copy of a record plus the last known-good version.
#[derive(Clone, Debug)]
pub struct FieldEdit<T> {
    last_good: T,
    working: T,
    modified: FxHashSet<String>,
}

impl<T: Clone + Validate> FieldEdit<T> {
    pub fn new(record: T) -> Self {
        Self {
            working: record.clone(),
            last_good: record,
            modified: FxHashSet::default(),
        }
    }

    pub fn working(&self) -> &T {
        &self.working
    }

    pub fn last_good(&self) -> &T {
        &self.last_good
    }

    pub fn is_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Modified field names, sorted.
    pub fn modified_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.modified.iter().map(|f| f.as_str()).collect();
        fields.sort_unstable();
        fields
    }

    /// Change `field` on the working copy. Nothing is validated yet.
    pub fn edit(&mut self, field: &str, apply: impl FnOnce(&mut T)) {
        apply(&mut self.working);
        self.modified.insert(field.to_string());
    }

    /// Check every modified field at the blur boundary.
    ///
    /// On failure the working copy goes back to the last known-good value.
    /// On success the caller commits the returned value and then calls
    /// [`mark_committed`] or [`revert`] depending on the remote result.
    ///
    /// [`mark_committed`]: FieldEdit::mark_committed
    /// [`revert`]: FieldEdit::revert
    pub fn on_blur(&mut self) -> BlurOutcome<T> {
        if self.modified.is_empty() {
            return BlurOutcome::Unchanged;
        }

        let failure = self
            .modified_fields()
            .into_iter()
            .find_map(|field| self.working.validate_field(field).err());

        match failure {
            Some(err) => {
                self.revert();
                BlurOutcome::Reverted(err)
            }
            None => BlurOutcome::Commit(self.working.clone()),
        }
    }

    /// The committed value is now the known-good one.
    pub fn mark_committed(&mut self) {
        self.last_good = self.working.clone();
        self.modified.clear();
    }

    /// Drop pending edits.
    pub fn revert(&mut self) {
        self.working = self.last_good.clone();
        self.modified.clear();
    }
}
