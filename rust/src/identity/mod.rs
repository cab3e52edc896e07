//! Content-derived identity for candidate schedules.
//!
//! Candidate schedules carry no id of their own. Their identity is the
//! canonical encoding of the whole value, which drives display numbering,
//! favorite membership, selection and deletion.

mod canonical;
mod favorites;
mod registry;

pub use canonical::{canonical_key, encode_canonical};
pub use favorites::FavoriteIndex;
pub use registry::{DisplayNumber, ScheduleRegistry};
