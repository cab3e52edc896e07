//! Lookup set over the persisted favorites list.

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::canonical::canonical_key;

/// Canonical keys of the favorited schedules.
///
/// Derived from the favorites list and rebuilt whenever it changes; the
/// list itself stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct FavoriteIndex {
    keys: FxHashSet<String>,
}

impl FavoriteIndex {
    /// Build an index from a favorites list.
    pub fn from_favorites<S: Serialize>(favorites: &[S]) -> Self {
        let mut index = Self::default();
        index.rebuild(favorites);
        index
    }

    /// Replace the index contents with the keys of `favorites`.
    pub fn rebuild<S: Serialize>(&mut self, favorites: &[S]) {
        self.rebuild_from_keys(favorites.iter().filter_map(|s| canonical_key(s)));
    }

    /// Replace the index contents with already-computed keys.
    pub fn rebuild_from_keys(&mut self, keys: impl IntoIterator<Item = String>) {
        self.keys = keys.into_iter().collect();
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
