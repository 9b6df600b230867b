//! Now-playing notification lifecycle.

use crate::state::SessionSnapshot;
use bridge_traits::notification::{
    MediaAction, MediaNotifier, NowPlayingNotification, PlayPauseIcon,
};
use core_runtime::events::SessionEvent;
use std::sync::Arc;
use tracing::{debug, warn};

/// Payload for the current state: track title and artist, an icon that
/// reflects `is_playing`, and the three transport actions.
pub fn build_notification(snapshot: &SessionSnapshot) -> NowPlayingNotification {
    NowPlayingNotification {
        title: snapshot.current_track.name.clone(),
        subtitle: snapshot.current_track.description.clone(),
        play_pause_icon: PlayPauseIcon::for_playing(snapshot.is_playing),
        artwork: snapshot.current_track.artwork.clone(),
        actions: MediaAction::ALL.to_vec(),
    }
}

/// Drives a [`MediaNotifier`]: the first payload starts the foreground
/// session, later ones update it in place. Notifier failures are logged and
/// never reach the caller.
pub(crate) struct NowPlayingPresenter {
    notifier: Arc<dyn MediaNotifier>,
    foreground: bool,
}

impl NowPlayingPresenter {
    pub(crate) fn new(notifier: Arc<dyn MediaNotifier>) -> Self {
        Self {
            notifier,
            foreground: false,
        }
    }

    pub(crate) fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Show `snapshot`. Returns the event to publish when the notifier
    /// accepted the payload.
    pub(crate) async fn refresh(&mut self, snapshot: &SessionSnapshot) -> Option<SessionEvent> {
        let notification = build_notification(snapshot);
        let title = notification.title.clone();

        if !self.foreground {
            match self.notifier.start_foreground(notification).await {
                Ok(()) => {
                    self.foreground = true;
                    debug!(title = %title, "Session promoted to foreground");
                    Some(SessionEvent::ForegroundStarted { title })
                }
                Err(err) => {
                    warn!(error = %err, "Failed to start foreground notification");
                    None
                }
            }
        } else {
            match self.notifier.update(notification).await {
                Ok(()) => Some(SessionEvent::NowPlayingUpdated {
                    title,
                    is_playing: snapshot.is_playing,
                }),
                Err(err) => {
                    warn!(error = %err, "Failed to update notification");
                    None
                }
            }
        }
    }

    /// Remove the notification if one is showing.
    pub(crate) async fn retract(&mut self) {
        if !self.foreground {
            return;
        }
        if let Err(err) = self.notifier.stop_foreground().await {
            warn!(error = %err, "Failed to stop foreground notification");
        }
        self.foreground = false;
    }
}
