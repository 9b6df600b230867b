//! Core service façade.
//!
//! [`PlayerService`] is the long-running playback service a host starts once
//! per process. It wires the configured bridges into a
//! [`PlaybackController`], hands out [`SessionBridge`]s to presentation code
//! and keeps the presentation-support state (favorites, upcoming rail) next
//! to the session. Desktop apps enable the `desktop-shims` feature (default)
//! so the audio output and notifier fall back to the `bridge-desktop`
//! implementations.

pub mod bridge;
pub mod error;
pub mod favorites;

pub use bridge::{PresentationState, SessionBridge};
pub use error::{CoreError, Result};
pub use favorites::Favorites;

use bridge_traits::lifecycle::{LifecycleObserver, LifecycleState};
use bridge_traits::notification::MediaAction;
use core_async::sync::{watch, CancellationToken};
use core_async::task;
use core_playback::{Catalog, PlaybackController, PlaybackError, Track, TrackId};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventBus, EventStream};
use tracing::{debug, info, warn};

/// Primary façade exposed to host applications.
pub struct PlayerService {
    controller: PlaybackController,
    events: EventBus,
    favorites: watch::Sender<Favorites>,
    lifecycle: Option<CancellationToken>,
}

impl PlayerService {
    /// Validate `config`, spawn the playback session for `catalog` and, when
    /// a lifecycle observer is configured, stop the session once the host
    /// removes its task.
    ///
    /// ```ignore
    /// let config = PlayerConfig::builder().build()?;
    /// let service = PlayerService::start(config, catalog).await?;
    /// let bridge = service.bridge();
    /// bridge.connect().await?;
    /// ```
    pub async fn start(config: PlayerConfig, catalog: Catalog) -> Result<Self> {
        config.validate().map_err(CoreError::from_runtime)?;

        let events = EventBus::new(config.event_buffer_size);
        let controller = PlaybackController::spawn(catalog, &config, events.clone());

        let lifecycle = match &config.lifecycle_observer {
            Some(observer) => Some(watch_lifecycle(observer.as_ref(), controller.clone()).await?),
            None => None,
        };

        info!(
            tracks = controller.catalog().len(),
            lifecycle = lifecycle.is_some(),
            "Player service started"
        );

        Ok(Self {
            controller,
            events,
            favorites: watch::channel(Favorites::new()).0,
            lifecycle,
        })
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// A new, disconnected bridge to this service's session.
    pub fn bridge(&self) -> SessionBridge {
        SessionBridge::new(self.controller.clone(), self.events.clone())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe_events(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running() && !self.controller.snapshot().phase.is_terminal()
    }

    /// Handle a host action identifier (`previous`, `next`, `play_pause`).
    pub async fn handle_media_action(&self, action: &str) -> Result<()> {
        let action = action.parse::<MediaAction>().map_err(|err| {
            warn!(action, "Ignoring unknown media action");
            CoreError::from(err)
        })?;
        debug!(%action, "Dispatching media action");
        Ok(self.controller.dispatch(action).await?)
    }

    /// The "next songs" rail for the current track.
    pub fn upcoming(&self) -> Vec<Track> {
        self.controller.upcoming()
    }

    pub fn favorites(&self) -> Favorites {
        self.favorites.borrow().clone()
    }

    pub fn subscribe_favorites(&self) -> watch::Receiver<Favorites> {
        self.favorites.subscribe()
    }

    /// Flip the favorite flag of a catalog track; returns the new flag.
    pub fn toggle_favorite(&self, id: TrackId) -> Result<bool> {
        if self.controller.catalog().find(&id).is_none() {
            return Err(PlaybackError::TrackNotFound(id).into());
        }
        let mut now_favorite = false;
        self.favorites.send_modify(|favorites| {
            now_favorite = favorites.toggle(id);
        });
        debug!(track = %id, favorite = now_favorite, "Favorite toggled");
        Ok(now_favorite)
    }

    /// Favorite tracks in catalog order.
    pub fn favorite_tracks(&self) -> Vec<Track> {
        self.favorites.borrow().tracks(&self.controller.catalog())
    }

    /// Stop the session. Stopping an already stopped session is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(token) = &self.lifecycle {
            token.cancel();
        }
        match self.controller.shutdown().await {
            Ok(()) | Err(PlaybackError::SessionStopped) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for PlayerService {
    fn drop(&mut self) {
        if let Some(token) = &self.lifecycle {
            token.cancel();
        }
    }
}

impl std::fmt::Debug for PlayerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerService")
            .field("controller", &self.controller)
            .field("favorites", &self.favorites.borrow().len())
            .finish()
    }
}

/// Shut the session down when the host reports `TaskRemoved`.
async fn watch_lifecycle(
    observer: &dyn LifecycleObserver,
    controller: PlaybackController,
) -> Result<CancellationToken> {
    let mut changes = observer.subscribe_changes().await?;
    let token = CancellationToken::new();
    let cancelled = token.clone();

    task::spawn(async move {
        loop {
            core_async::select! {
                _ = cancelled.cancelled() => break,
                state = changes.next() => match state {
                    Some(LifecycleState::TaskRemoved) => {
                        info!("Host task removed; stopping playback session");
                        if let Err(err) = controller.shutdown().await {
                            debug!(error = %err, "Session already stopped");
                        }
                        break;
                    }
                    Some(state) => debug!(?state, "Host lifecycle changed"),
                    None => break,
                },
            }
        }
    });

    Ok(token)
}
