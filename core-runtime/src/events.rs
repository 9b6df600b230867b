//! # Event Bus System
//!
//! Typed session events broadcast over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: [`PlaybackEvent`] for audio-level transitions and
//!   [`SessionEvent`] for the session surface (notification, bridge,
//!   catalog), wrapped in [`CoreEvent`]
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Receiver wrapper with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   emit    ┌───────────┐
//! │ Playback actor  ├──────────>│           │   subscribe   ┌────────────┐
//! └─────────────────┘           │ EventBus  ├──────────────>│ Presenter  │
//!                               │ (broadcast│               └────────────┘
//! ┌─────────────────┐   emit    │  channel) │   subscribe   ┌────────────┐
//! │ Session bridge  ├──────────>│           ├──────────────>│ Telemetry  │
//! └─────────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Playback(PlaybackEvent::Paused {
//!         track_id: "4b1c".to_string(),
//!         position_ms: 42_000,
//!     }))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.description(), "Playback paused");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber was too slow and missed `n`
//!   events. Non-fatal; position ticks are the usual cause.
//! - **`RecvError::Closed`**: every sender is gone; the session has shut down.
//!
//! Emitting with no subscriber returns an error that publishers ignore with
//! `.ok()`: nobody listening is not a failure.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Audio-level playback transitions
    Playback(PlaybackEvent),
    /// Session surface transitions
    Session(SessionEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Session(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Session(SessionEvent::CommandDropped { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::TrackChanged { .. })
            | CoreEvent::Playback(PlaybackEvent::Started { .. })
            | CoreEvent::Session(SessionEvent::ForegroundStarted { .. })
            | CoreEvent::Session(SessionEvent::Stopped) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events related to audio playback of the current track.
///
/// Track ids are the string form of the catalog's `TrackId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The cursor moved to another track; its audio is loading.
    TrackChanged {
        track_id: String,
        title: String,
        /// Catalog position, `None` when the cursor is detached
        index: Option<usize>,
    },
    /// Playback of a freshly loaded track started.
    Started { track_id: String, title: String },
    /// Playback paused.
    Paused {
        track_id: String,
        /// Position when paused (milliseconds)
        position_ms: u64,
    },
    /// Playback resumed in place.
    Resumed { track_id: String, position_ms: u64 },
    /// The poller sampled a new position.
    PositionChanged {
        track_id: String,
        position_ms: u64,
        duration_ms: u64,
    },
    /// A load or output call failed; the session stays usable.
    Error {
        track_id: Option<String>,
        message: String,
        /// Whether another `play_pause` may succeed
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::TrackChanged { .. } => "Track changed",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Session Events
// ============================================================================

/// Events related to the session surface around the controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// The first notification promoted the session to the foreground.
    ForegroundStarted { title: String },
    /// The notification payload was refreshed in place.
    NowPlayingUpdated { title: String, is_playing: bool },
    /// The working catalog was replaced.
    CatalogReplaced {
        track_count: usize,
        /// Whether the current track survived the replacement
        cursor_retained: bool,
    },
    /// A presentation bridge bound to the session.
    BridgeConnected,
    /// A presentation bridge unbound; its snapshot is frozen.
    BridgeDisconnected,
    /// A bridge command arrived while disconnected and was discarded.
    CommandDropped { command: String },
    /// The session terminated.
    Stopped,
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::ForegroundStarted { .. } => "Session moved to foreground",
            SessionEvent::NowPlayingUpdated { .. } => "Now playing updated",
            SessionEvent::CatalogReplaced { .. } => "Catalog replaced",
            SessionEvent::BridgeConnected => "Bridge connected",
            SessionEvent::BridgeDisconnected => "Bridge disconnected",
            SessionEvent::CommandDropped { .. } => "Command dropped while disconnected",
            SessionEvent::Stopped => "Session stopped",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Clones share the same channel. Each [`subscribe`](Self::subscribe) call
/// creates an independent receiver that sees only events emitted after it.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber before it starts lagging.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let session_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Session(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once every sender is dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). `None` when nothing
    /// matching is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
