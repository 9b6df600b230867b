//! Session state and its observable channels.
//!
//! The controller actor is the only writer. Every mutation is published as a
//! whole [`SessionSnapshot`] plus four per-field channels, so observers that
//! only care about, say, the position are not woken by unrelated changes.

use crate::catalog::{Catalog, Track};
use core_async::sync::watch;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a session.
///
/// ```text
/// Idle    --play_pause-->     Playing   (first load, synchronous)
/// Playing --play_pause-->     Paused
/// Paused  --play_pause-->     Playing   (resume)
/// any live --advance/select--> Loading
/// Loading --ready-->          Playing
/// Loading --load failed-->    Idle
/// any live --shutdown-->      Stopped   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Current track's audio has not been loaded.
    Idle,
    /// A track change is preparing its audio.
    Loading,
    Playing,
    Paused,
    Stopped,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Stopped)
    }
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Position of `current_track` in the working catalog; `None` when the
    /// catalog was replaced by one without it.
    pub current_index: Option<usize>,
    pub current_track: Track,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Whether the notification promoted the session to the foreground.
    pub is_foreground: bool,
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    /// First track, idle, nothing loaded.
    pub fn initial(catalog: &Catalog) -> Self {
        Self {
            current_index: Some(0),
            current_track: catalog.first().clone(),
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            is_foreground: false,
            phase: SessionPhase::Idle,
        }
    }
}

/// Per-field receivers returned by `PlaybackController::observe`.
#[derive(Debug, Clone)]
pub struct SessionObservers {
    pub is_playing: watch::Receiver<bool>,
    pub duration_ms: watch::Receiver<u64>,
    pub position_ms: watch::Receiver<u64>,
    pub current_track: watch::Receiver<Track>,
}

/// Write side of every session channel.
#[derive(Debug)]
pub(crate) struct StatePublisher {
    snapshot: watch::Sender<SessionSnapshot>,
    is_playing: watch::Sender<bool>,
    duration_ms: watch::Sender<u64>,
    position_ms: watch::Sender<u64>,
    current_track: watch::Sender<Track>,
}

fn replace_if_changed<T: PartialEq + Clone>(sender: &watch::Sender<T>, value: &T) {
    sender.send_if_modified(|current| {
        if current == value {
            false
        } else {
            *current = value.clone();
            true
        }
    });
}

impl StatePublisher {
    pub(crate) fn new(initial: &SessionSnapshot) -> Self {
        Self {
            snapshot: watch::channel(initial.clone()).0,
            is_playing: watch::channel(initial.is_playing).0,
            duration_ms: watch::channel(initial.duration_ms).0,
            position_ms: watch::channel(initial.position_ms).0,
            current_track: watch::channel(initial.current_track.clone()).0,
        }
    }

    /// Publish `state`; field channels only notify when their value changed.
    pub(crate) fn publish(&self, state: &SessionSnapshot) {
        replace_if_changed(&self.is_playing, &state.is_playing);
        replace_if_changed(&self.duration_ms, &state.duration_ms);
        replace_if_changed(&self.position_ms, &state.position_ms);
        replace_if_changed(&self.current_track, &state.current_track);
        replace_if_changed(&self.snapshot, state);
    }

    pub(crate) fn current(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn playing(&self) -> watch::Receiver<bool> {
        self.is_playing.subscribe()
    }

    pub(crate) fn observers(&self) -> SessionObservers {
        SessionObservers {
            is_playing: self.is_playing.subscribe(),
            duration_ms: self.duration_ms.subscribe(),
            position_ms: self.position_ms.subscribe(),
            current_track: self.current_track.subscribe(),
        }
    }
}
