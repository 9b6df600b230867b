//! # Session Bridge
//!
//! The presentation layer never talks to the controller directly. It holds a
//! [`SessionBridge`], which keeps a local copy of the session state and
//! forwards transport commands while connected.
//!
//! ```text
//!  PlaybackController ──watch──▶ forwarder ──▶ presentation copy ──▶ UI
//!          ▲                                                         │
//!          └──────────── play_pause / next / previous ◀──────────────┘
//!                        (dropped while disconnected)
//! ```
//!
//! Disconnecting freezes the copy. Whatever the controller does meanwhile
//! becomes visible on the next `connect`, which re-seeds from the
//! controller's current state.

use crate::error::{CoreError, Result};
use core_async::sync::{watch, CancellationToken, Mutex};
use core_async::task;
use core_playback::{PlaybackController, SessionSnapshot, TrackId};
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::sync::Arc;
use tracing::{debug, info};

/// Presentation copy of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    pub snapshot: SessionSnapshot,
    pub connected: bool,
}

/// Connection between a presentation layer and the running session.
///
/// Clones share the same connection.
#[derive(Clone)]
pub struct SessionBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    controller: PlaybackController,
    events: EventBus,
    presentation: Arc<watch::Sender<PresentationState>>,
    /// Token of the live forwarder.
    forwarder: Mutex<Option<CancellationToken>>,
}

impl SessionBridge {
    /// Create a disconnected bridge.
    pub fn new(controller: PlaybackController, events: EventBus) -> Self {
        let (presentation, _) = watch::channel(PresentationState {
            snapshot: controller.snapshot(),
            connected: false,
        });

        Self {
            inner: Arc::new(BridgeInner {
                controller,
                events,
                presentation: Arc::new(presentation),
                forwarder: Mutex::new(None),
            }),
        }
    }

    /// Bind to the controller and start mirroring its state.
    ///
    /// Connecting again replaces the forwarder and re-seeds the copy.
    pub async fn connect(&self) -> Result<()> {
        let mut forwarder = self.inner.forwarder.lock().await;

        let controller = &self.inner.controller;
        if !controller.is_running() || controller.snapshot().phase.is_terminal() {
            return Err(CoreError::SessionUnavailable);
        }

        if let Some(previous) = forwarder.take() {
            previous.cancel();
        }

        let mut source = controller.subscribe();
        let seed = source.borrow_and_update().clone();
        self.inner.presentation.send_replace(PresentationState {
            snapshot: seed,
            connected: true,
        });

        let token = CancellationToken::new();
        task::spawn(forward(
            source,
            Arc::clone(&self.inner.presentation),
            token.clone(),
        ));
        *forwarder = Some(token);

        info!("Session bridge connected");
        self.emit(SessionEvent::BridgeConnected);
        Ok(())
    }

    /// Stop mirroring. The copy keeps the last state it saw.
    pub async fn disconnect(&self) {
        let mut forwarder = self.inner.forwarder.lock().await;
        let Some(token) = forwarder.take() else {
            return;
        };
        token.cancel();
        self.inner
            .presentation
            .send_modify(|state| state.connected = false);

        info!("Session bridge disconnected");
        self.emit(SessionEvent::BridgeDisconnected);
    }

    pub fn is_connected(&self) -> bool {
        self.inner.presentation.borrow().connected
    }

    pub fn snapshot(&self) -> PresentationState {
        self.inner.presentation.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.inner.presentation.subscribe()
    }

    pub async fn play_pause(&self) -> Result<()> {
        if !self.accepts("play_pause") {
            return Ok(());
        }
        Ok(self.inner.controller.play_pause().await?)
    }

    pub async fn next(&self) -> Result<()> {
        if !self.accepts("next") {
            return Ok(());
        }
        Ok(self.inner.controller.next().await?)
    }

    pub async fn previous(&self) -> Result<()> {
        if !self.accepts("previous") {
            return Ok(());
        }
        Ok(self.inner.controller.previous().await?)
    }

    pub async fn select_track(&self, id: TrackId) -> Result<()> {
        if !self.accepts("select_track") {
            return Ok(());
        }
        Ok(self.inner.controller.select_track(id).await?)
    }

    /// Commands are forwarded only while connected; nothing is buffered.
    fn accepts(&self, command: &str) -> bool {
        if self.is_connected() {
            return true;
        }
        debug!(command, "Bridge not connected; command dropped");
        self.emit(SessionEvent::CommandDropped {
            command: command.to_string(),
        });
        false
    }

    fn emit(&self, event: SessionEvent) {
        self.inner.events.emit(CoreEvent::Session(event)).ok();
    }
}

impl std::fmt::Debug for SessionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBridge")
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn forward(
    mut source: watch::Receiver<SessionSnapshot>,
    presentation: Arc<watch::Sender<PresentationState>>,
    token: CancellationToken,
) {
    loop {
        core_async::select! {
            _ = token.cancelled() => break,
            changed = source.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = source.borrow_and_update().clone();
                presentation.send_if_modified(|state| {
                    if token.is_cancelled() || state.snapshot == snapshot {
                        return false;
                    }
                    state.snapshot = snapshot;
                    true
                });
            }
        }
    }
    debug!("Bridge forwarder finished");
}
