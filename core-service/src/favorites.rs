//! Favorite tracks.
//!
//! Held in memory for the lifetime of the service. Hosts that want to keep
//! favorites across launches serialize the set themselves.

use core_playback::{Catalog, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of favorite track ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: HashSet<TrackId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the track was not a favorite yet.
    pub fn add(&mut self, id: TrackId) -> bool {
        self.ids.insert(id)
    }

    /// Returns `true` if the track was a favorite.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        self.ids.remove(id)
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, id: TrackId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorite tracks present in `catalog`, in catalog order.
    pub fn tracks(&self, catalog: &Catalog) -> Vec<Track> {
        catalog
            .iter()
            .filter(|track| self.ids.contains(&track.id))
            .cloned()
            .collect()
    }
}
