//! Notification surface that renders the now-playing payload to the log.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    notification::{MediaNotifier, NowPlayingNotification},
};
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
struct NotifierState {
    foreground: bool,
    current: Option<NowPlayingNotification>,
    updates: usize,
}

/// [`MediaNotifier`] for desktop shells without a system media center.
///
/// Each payload is emitted as a structured `tracing` event. The last payload
/// is kept so a tray icon or status line can render it on demand.
#[derive(Debug, Default)]
pub struct TracingNotifier {
    state: Mutex<NotifierState>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload currently on display, if the session is in the foreground.
    pub fn current(&self) -> Option<NowPlayingNotification> {
        self.state.lock().ok().and_then(|s| s.current.clone())
    }

    pub fn is_foreground(&self) -> bool {
        self.state.lock().map(|s| s.foreground).unwrap_or(false)
    }

    /// Number of in-place updates since the last foreground start.
    pub fn update_count(&self) -> usize {
        self.state.lock().map(|s| s.updates).unwrap_or(0)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut NotifierState) -> R) -> Result<R> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| BridgeError::OperationFailed("notifier state poisoned".to_string()))?;
        Ok(f(&mut state))
    }
}

#[async_trait]
impl MediaNotifier for TracingNotifier {
    async fn start_foreground(&self, notification: NowPlayingNotification) -> Result<()> {
        info!(
            title = %notification.title,
            subtitle = %notification.subtitle,
            icon = ?notification.play_pause_icon,
            "Now playing (foreground)"
        );
        self.with_state(|state| {
            state.foreground = true;
            state.updates = 0;
            state.current = Some(notification);
        })
    }

    async fn update(&self, notification: NowPlayingNotification) -> Result<()> {
        info!(
            title = %notification.title,
            icon = ?notification.play_pause_icon,
            "Now playing updated"
        );
        self.with_state(|state| {
            state.updates += 1;
            state.current = Some(notification);
        })
    }

    async fn stop_foreground(&self) -> Result<()> {
        info!("Now playing cleared");
        self.with_state(|state| {
            state.foreground = false;
            state.current = None;
        })
    }
}
