//! # Track Catalog
//!
//! The ordered, non-empty list of tracks a session plays through.
//!
//! Cursor movement wraps around in both directions:
//!
//! ```text
//! next     = (i + 1) mod n
//! previous = (i - 1 + n) mod n
//! ```
//!
//! A cursor may be *detached* (`None`) after the catalog was replaced by one
//! that does not contain the current track. Stepping a detached cursor lands
//! on the first track going forward and on the last track going backward.

use crate::error::{PlaybackError, Result};
use bridge_traits::playback::{ArtworkHandle, AudioHandle};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TrackId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A playable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Secondary line, usually the artist
    pub description: String,
    pub audio: AudioHandle,
    pub artwork: ArtworkHandle,
}

impl Track {
    /// Create a track with a fresh id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        audio: impl Into<AudioHandle>,
        artwork: impl Into<ArtworkHandle>,
    ) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            description: description.into(),
            audio: audio.into(),
            artwork: artwork.into(),
        }
    }

    /// Replace the generated id, e.g. with one persisted by the host.
    pub fn with_id(mut self, id: TrackId) -> Self {
        self.id = id;
        self
    }
}

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Next,
    Previous,
}

/// Immutable, non-empty, cheaply clonable track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Arc<[Track]>,
}

impl Catalog {
    /// Build a catalog. Rejects empty lists and duplicate ids.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.id) {
                return Err(PlaybackError::DuplicateTrack(track.id));
            }
        }

        Ok(Self {
            tracks: tracks.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn first(&self) -> &Track {
        // Non-empty by construction.
        &self.tracks[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| &track.id == id)
    }

    pub fn find(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| &track.id == id)
    }

    /// Index reached by moving `cursor` one step in `direction`.
    pub fn step(&self, cursor: Option<usize>, direction: Direction) -> usize {
        let n = self.len();
        match (cursor, direction) {
            (Some(i), Direction::Next) => (i % n + 1) % n,
            (Some(i), Direction::Previous) => (i % n + n - 1) % n,
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => n - 1,
        }
    }

    /// The tracks after `cursor` in wrap-around order, excluding the current
    /// one. Empty for a detached cursor.
    pub fn upcoming(&self, cursor: Option<usize>) -> Vec<Track> {
        let Some(current) = cursor else {
            return Vec::new();
        };
        let n = self.len();
        (1..n)
            .map(|offset| self.tracks[(current + offset) % n].clone())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
