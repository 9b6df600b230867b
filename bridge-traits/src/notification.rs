//! Now-playing notification surface and media actions.
//!
//! While a session is active the host shows a persistent notification (lock
//! screen, media center, tray...) carrying the current track and three
//! buttons. Button taps come back to the core as [`MediaAction`]s identified
//! by stable strings, so they can travel through intents, IPC or URLs.

use crate::{
    error::{BridgeError, Result},
    playback::ArtworkHandle,
    platform::PlatformSendSync,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport action delivered by a notification button or any other
/// out-of-band host control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaAction {
    Previous,
    Next,
    PlayPause,
}

impl MediaAction {
    /// All actions in the order they appear on the notification.
    pub const ALL: [MediaAction; 3] = [
        MediaAction::Previous,
        MediaAction::Next,
        MediaAction::PlayPause,
    ];

    /// Stable identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaAction::Previous => "previous",
            MediaAction::Next => "next",
            MediaAction::PlayPause => "play_pause",
        }
    }
}

impl fmt::Display for MediaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaAction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "previous" => Ok(MediaAction::Previous),
            "next" => Ok(MediaAction::Next),
            "play_pause" => Ok(MediaAction::PlayPause),
            other => Err(BridgeError::UnknownAction(other.to_string())),
        }
    }
}

/// Icon shown on the play/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayPauseIcon {
    /// Playback is paused; the button starts it.
    Play,
    /// Playback is running; the button pauses it.
    Pause,
}

impl PlayPauseIcon {
    pub fn for_playing(is_playing: bool) -> Self {
        if is_playing {
            PlayPauseIcon::Pause
        } else {
            PlayPauseIcon::Play
        }
    }
}

/// Display payload for the persistent notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlayingNotification {
    pub title: String,
    pub subtitle: String,
    pub play_pause_icon: PlayPauseIcon,
    pub artwork: ArtworkHandle,
    pub actions: Vec<MediaAction>,
}

/// Host surface that keeps the session alive and visible.
///
/// The first payload of a session promotes it to a foreground session
/// (Android foreground service, macOS Now Playing entry...). Later payloads
/// replace the displayed content in place.
#[async_trait::async_trait]
pub trait MediaNotifier: PlatformSendSync {
    /// Announce the session and show the first payload.
    async fn start_foreground(&self, notification: NowPlayingNotification) -> Result<()>;

    /// Replace the displayed payload.
    async fn update(&self, notification: NowPlayingNotification) -> Result<()>;

    /// Remove the notification and retract the foreground announcement.
    async fn stop_foreground(&self) -> Result<()>;
}
