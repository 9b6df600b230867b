//! Wall-clock audio output for desktop hosts.
//!
//! `ClockedAudioOutput` tracks playback position against the runtime clock
//! instead of an audio device. Sample output is left to the host's audio
//! stack; the core only needs a source that can be prepared, started, paused
//! and polled for position, which is exactly what this type models.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    playback::{AudioHandle, AudioOutput, AudioOutputFactory},
};
use core_async::sync::Mutex;
use core_async::task;
use core_async::time::{Duration, Instant};
use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How a [`ClockedAudioOutput`] learns the length of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationProbe {
    /// Read the file's audio properties with `lofty`. Missing or unreadable
    /// files fail to prepare.
    File,
    /// Every source has this duration. Used for demos and tests that have no
    /// audio files on disk.
    Fixed(Duration),
}

#[derive(Debug, Default)]
struct OutputState {
    source: Option<AudioHandle>,
    duration: Duration,
    /// Position accumulated before the current run.
    played: Duration,
    /// Set while started.
    started_at: Option<Instant>,
    released: bool,
}

impl OutputState {
    fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|since| since.elapsed())
            .unwrap_or_default();
        (self.played + running).min(self.duration)
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.released {
            return Err(BridgeError::OperationFailed(
                "audio output already released".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_prepared(&self) -> Result<()> {
        self.ensure_usable()?;
        if self.source.is_none() {
            return Err(BridgeError::OperationFailed(
                "no source prepared".to_string(),
            ));
        }
        Ok(())
    }
}

/// Desktop [`AudioOutput`] driven by the runtime clock.
#[derive(Debug)]
pub struct ClockedAudioOutput {
    probe: DurationProbe,
    state: Mutex<OutputState>,
}

impl ClockedAudioOutput {
    pub fn new(probe: DurationProbe) -> Self {
        Self {
            probe,
            state: Mutex::new(OutputState::default()),
        }
    }

    async fn probe_duration(&self, source: &AudioHandle) -> Result<Duration> {
        match self.probe {
            DurationProbe::Fixed(duration) => Ok(duration),
            DurationProbe::File => {
                let path = PathBuf::from(source.as_str());
                let handle = source.clone();
                task::spawn_blocking(move || read_file_duration(path))
                    .await
                    .map_err(|e| BridgeError::OperationFailed(format!("probe task failed: {e}")))?
                    .map_err(|message| {
                        BridgeError::SourceUnavailable(format!("{handle}: {message}"))
                    })
            }
        }
    }
}

fn read_file_duration(path: PathBuf) -> std::result::Result<Duration, String> {
    let tagged_file = Probe::open(&path)
        .map_err(|e| format!("failed to open file: {e}"))?
        .options(ParseOptions::new())
        .guess_file_type()
        .map_err(|e| format!("failed to probe file: {e}"))?
        .read()
        .map_err(|e| format!("failed to parse file: {e}"))?;

    Ok(tagged_file.properties().duration())
}

#[async_trait]
impl AudioOutput for ClockedAudioOutput {
    #[instrument(skip(self), fields(source = %source))]
    async fn prepare(&self, source: &AudioHandle) -> Result<()> {
        self.state.lock().await.ensure_usable()?;

        let duration = self.probe_duration(source).await?;

        let mut state = self.state.lock().await;
        state.ensure_usable()?;
        state.source = Some(source.clone());
        state.duration = duration;
        state.played = Duration::ZERO;
        state.started_at = None;
        debug!(duration_ms = duration.as_millis() as u64, "Source prepared");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_prepared()?;
        if state.started_at.is_none() {
            state.started_at = Some(Instant::now());
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_prepared()?;
        if state.started_at.is_some() {
            state.played = state.position();
            state.started_at = None;
        }
        Ok(())
    }

    async fn position(&self) -> Result<Duration> {
        let state = self.state.lock().await;
        state.ensure_usable()?;
        Ok(state.position())
    }

    async fn duration(&self) -> Result<Duration> {
        let state = self.state.lock().await;
        state.ensure_usable()?;
        Ok(state.duration)
    }

    async fn is_playing(&self) -> bool {
        let state = self.state.lock().await;
        !state.released && state.started_at.is_some() && state.position() < state.duration
    }

    async fn release(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.released = true;
        state.started_at = None;
        state.source = None;
        Ok(())
    }
}

/// Factory producing [`ClockedAudioOutput`]s with a shared probe strategy.
#[derive(Debug, Clone)]
pub struct ClockedAudioOutputFactory {
    probe: DurationProbe,
}

impl ClockedAudioOutputFactory {
    /// Factory whose outputs probe real files on disk.
    pub fn new() -> Self {
        Self {
            probe: DurationProbe::File,
        }
    }

    /// Factory whose outputs report the same duration for every source.
    pub fn with_fixed_duration(duration: Duration) -> Self {
        Self {
            probe: DurationProbe::Fixed(duration),
        }
    }

    pub fn probe(&self) -> DurationProbe {
        self.probe
    }
}

impl Default for ClockedAudioOutputFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutputFactory for ClockedAudioOutputFactory {
    fn create(&self) -> Result<Arc<dyn AudioOutput>> {
        Ok(Arc::new(ClockedAudioOutput::new(self.probe)))
    }
}
