//! Audio output bridge traits and resource handles.
//!
//! The playback core never touches a platform media player directly. It
//! drives an [`AudioOutput`] obtained from an [`AudioOutputFactory`], one
//! output per loaded track, and releases it before loading the next one.
//! Hosts map these calls onto their native engine (MediaPlayer, AVPlayer,
//! a desktop decoder pipeline...).

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Opaque reference to an audio resource understood by the host.
///
/// On desktop this is a file path or URI; on mobile it may be a bundled raw
/// resource identifier rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioHandle(String);

impl AudioHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AudioHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AudioHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque reference to an artwork image understood by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkHandle(String);

impl ArtworkHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtworkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtworkHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArtworkHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single-use audio output bound to at most one prepared source.
///
/// The output does not push position updates; callers poll
/// [`position`](AudioOutput::position) while playback is running.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::playback::{AudioHandle, AudioOutput};
///
/// async fn play_once(output: &dyn AudioOutput) -> bridge_traits::error::Result<()> {
///     output.prepare(&AudioHandle::new("music/kabira.mp3")).await?;
///     output.start().await?;
///     let total = output.duration().await?;
///     println!("playing {:?}", total);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait AudioOutput: PlatformSendSync {
    /// Load the given source so it is ready to start. Fails with
    /// [`BridgeError::SourceUnavailable`](crate::error::BridgeError::SourceUnavailable)
    /// when the handle cannot be resolved.
    async fn prepare(&self, source: &AudioHandle) -> Result<()>;

    /// Begin or resume playback of the prepared source.
    async fn start(&self) -> Result<()>;

    /// Pause playback, keeping the current position.
    async fn pause(&self) -> Result<()>;

    /// Current playback position.
    async fn position(&self) -> Result<Duration>;

    /// Total duration of the prepared source.
    async fn duration(&self) -> Result<Duration>;

    /// Whether the output is currently producing sound.
    async fn is_playing(&self) -> bool;

    /// Release native resources. The output must not be used afterwards.
    async fn release(&self) -> Result<()>;
}

/// Allocates fresh [`AudioOutput`] instances.
///
/// A new output is created for every track change so a stale output from a
/// previous load can never be reused.
pub trait AudioOutputFactory: PlatformSendSync {
    fn create(&self) -> Result<Arc<dyn AudioOutput>>;
}
