//! Optimistic mutation discipline shared by every create/update/delete.
//!
//! Local state changes first, the remote command runs second, and a remote
//! failure restores the pre-change snapshot.

mod controller;
mod field_edit;

pub use controller::{
    Change, Keyed, MutationController, MutationError, MutationOutcome, StatusKind, StatusMessage,
};
pub use field_edit::{BlurOutcome, FieldEdit};
