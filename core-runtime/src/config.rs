//! # Player Configuration
//!
//! Holds the host capabilities and tuning knobs a playback session needs.
//!
//! ## Overview
//!
//! [`PlayerConfig`] is assembled through [`PlayerConfigBuilder`], which fails
//! fast with an actionable [`Error::CapabilityMissing`] when a required bridge
//! is absent instead of letting the session fail on first use.
//!
//! ## Required Dependencies
//!
//! - `AudioOutputFactory` - Allocates an audio output per loaded track
//! - `MediaNotifier` - Now-playing notification / foreground announcement
//!
//! ## Optional Dependencies
//!
//! - `LifecycleObserver` - Lets the session stop when the host task is removed
//!
//! When the `desktop-shims` feature is enabled, the desktop implementations
//! from `bridge-desktop` are injected for any required bridge that was not
//! provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PlayerConfig;
//! use std::time::Duration;
//!
//! let config = PlayerConfig::builder()
//!     .position_poll_interval(Duration::from_millis(500))
//!     .build()
//!     .expect("desktop defaults");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{AudioOutputFactory, LifecycleObserver, MediaNotifier};
use std::sync::Arc;
use std::time::Duration;

/// Interval between position samples while playing.
pub const DEFAULT_POSITION_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const MIN_POSITION_POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const MAX_POSITION_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Broadcast buffer of the session event bus.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Configuration for a playback session.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Allocates a fresh audio output for every load
    pub audio_output_factory: Arc<dyn AudioOutputFactory>,

    /// Host notification surface
    pub media_notifier: Arc<dyn MediaNotifier>,

    /// Host lifecycle observer (optional)
    pub lifecycle_observer: Option<Arc<dyn LifecycleObserver>>,

    /// Period of the position poller
    pub position_poll_interval: Duration,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("audio_output_factory", &"AudioOutputFactory { ... }")
            .field("media_notifier", &"MediaNotifier { ... }")
            .field(
                "lifecycle_observer",
                &self
                    .lifecycle_observer
                    .as_ref()
                    .map(|_| "LifecycleObserver { ... }"),
            )
            .field("position_poll_interval", &self.position_poll_interval)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Checks the tuning values.
    ///
    /// - Poll interval within 50 ms..=60 s
    /// - Event buffer larger than zero
    pub fn validate(&self) -> Result<()> {
        if self.position_poll_interval < MIN_POSITION_POLL_INTERVAL {
            return Err(Error::Config(format!(
                "Position poll interval must be at least {} ms",
                MIN_POSITION_POLL_INTERVAL.as_millis()
            )));
        }

        if self.position_poll_interval > MAX_POSITION_POLL_INTERVAL {
            return Err(Error::Config(format!(
                "Position poll interval exceeds maximum of {} seconds",
                MAX_POSITION_POLL_INTERVAL.as_secs()
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn audio_output_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "AudioOutputFactory".to_string(),
        message: "AudioOutputFactory implementation is required to load and play tracks. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ClockedAudioOutputFactory. \
                 Mobile: inject a factory wrapping the native media player (MediaPlayer/AVPlayer)."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn media_notifier_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaNotifier".to_string(),
        message: "MediaNotifier implementation is required for the now-playing notification. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default TracingNotifier. \
                 Mobile: inject a foreground-service notification (Android) or Now Playing center (iOS)."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_audio_output_factory() -> Result<Arc<dyn AudioOutputFactory>> {
    use bridge_desktop::ClockedAudioOutputFactory;

    let factory: Arc<dyn AudioOutputFactory> = Arc::new(ClockedAudioOutputFactory::new());
    Ok(factory)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_audio_output_factory() -> Result<Arc<dyn AudioOutputFactory>> {
    Err(audio_output_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_media_notifier() -> Result<Arc<dyn MediaNotifier>> {
    use bridge_desktop::TracingNotifier;

    let notifier: Arc<dyn MediaNotifier> = Arc::new(TracingNotifier::new());
    Ok(notifier)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_media_notifier() -> Result<Arc<dyn MediaNotifier>> {
    Err(media_notifier_missing_error())
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    audio_output_factory: Option<Arc<dyn AudioOutputFactory>>,
    media_notifier: Option<Arc<dyn MediaNotifier>>,
    lifecycle_observer: Option<Arc<dyn LifecycleObserver>>,
    position_poll_interval: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl PlayerConfigBuilder {
    /// Sets the audio output factory (required).
    ///
    /// Falls back to `ClockedAudioOutputFactory` when `desktop-shims` is
    /// enabled.
    pub fn audio_output_factory(mut self, factory: Arc<dyn AudioOutputFactory>) -> Self {
        self.audio_output_factory = Some(factory);
        self
    }

    /// Sets the media notifier (required).
    ///
    /// Falls back to `TracingNotifier` when `desktop-shims` is enabled.
    pub fn media_notifier(mut self, notifier: Arc<dyn MediaNotifier>) -> Self {
        self.media_notifier = Some(notifier);
        self
    }

    /// Sets the lifecycle observer (optional).
    ///
    /// When present, the session shuts down once the host reports that its
    /// task was removed.
    pub fn lifecycle_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle_observer = Some(observer);
        self
    }

    /// Sets the position poll interval.
    ///
    /// Default: 1000 ms
    pub fn position_poll_interval(mut self, interval: Duration) -> Self {
        self.position_poll_interval = Some(interval);
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds and validates the final `PlayerConfig`.
    ///
    /// Fails when a required bridge is missing (and no desktop default is
    /// available) or a tuning value is out of range.
    pub fn build(self) -> Result<PlayerConfig> {
        let audio_output_factory = match self.audio_output_factory {
            Some(factory) => factory,
            None => provide_default_audio_output_factory()?,
        };

        let media_notifier = match self.media_notifier {
            Some(notifier) => notifier,
            None => provide_default_media_notifier()?,
        };

        let config = PlayerConfig {
            audio_output_factory,
            media_notifier,
            lifecycle_observer: self.lifecycle_observer,
            position_poll_interval: self
                .position_poll_interval
                .unwrap_or(DEFAULT_POSITION_POLL_INTERVAL),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
