//! Position and duration sampling.
//!
//! Audio outputs do not push progress, so while a track plays a background
//! task samples it and reports back to the controller actor. At most one
//! poller is live: starting a new one cancels the previous token first.

use bridge_traits::playback::AudioOutput;
use core_async::sync::{mpsc, watch, CancellationToken};
use core_async::task;
use core_async::time::{sleep, Duration};
use std::sync::Arc;
use tracing::{debug, trace};

/// Report sent from the poller to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sample {
    Duration(u64),
    Position(u64),
}

/// A sample tagged with the poller and load that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PollReport {
    pub(crate) epoch: u64,
    pub(crate) generation: u64,
    pub(crate) sample: Sample,
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Owns the single live poller of a session.
pub(crate) struct DurationPoller {
    interval: Duration,
    epoch: u64,
    token: Option<CancellationToken>,
}

impl DurationPoller {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            epoch: 0,
            token: None,
        }
    }

    /// Epoch of the most recently started poller. Reports from any other
    /// epoch are stale.
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.token
            .as_ref()
            .map(|token| !token.is_cancelled())
            .unwrap_or(false)
    }

    /// Cancel the live poller, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// Replace the live poller with one sampling `output`.
    ///
    /// The new task samples the duration once, then the position every
    /// interval for as long as `is_playing` stays true and the token is not
    /// cancelled.
    pub(crate) fn restart(
        &mut self,
        output: Arc<dyn AudioOutput>,
        generation: u64,
        is_playing: watch::Receiver<bool>,
        reports: mpsc::UnboundedSender<PollReport>,
    ) {
        self.cancel();
        self.epoch += 1;

        let token = CancellationToken::new();
        self.token = Some(token.clone());

        let run = PollRun {
            output,
            epoch: self.epoch,
            generation,
            interval: self.interval,
            is_playing,
            reports,
            token,
        };
        task::spawn(run.run());
    }
}

impl Drop for DurationPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct PollRun {
    output: Arc<dyn AudioOutput>,
    epoch: u64,
    generation: u64,
    interval: Duration,
    is_playing: watch::Receiver<bool>,
    reports: mpsc::UnboundedSender<PollReport>,
    token: CancellationToken,
}

impl PollRun {
    fn report(&self, sample: Sample) -> bool {
        self.reports
            .send(PollReport {
                epoch: self.epoch,
                generation: self.generation,
                sample,
            })
            .is_ok()
    }

    fn should_continue(&self) -> bool {
        !self.token.is_cancelled() && *self.is_playing.borrow()
    }

    async fn run(self) {
        debug!(epoch = self.epoch, generation = self.generation, "Poller started");

        if let Ok(duration) = self.output.duration().await {
            if !self.report(Sample::Duration(millis(duration))) {
                return;
            }
        }

        while self.should_continue() {
            core_async::select! {
                _ = self.token.cancelled() => break,
                _ = sleep(self.interval) => {}
            }

            if !self.should_continue() {
                break;
            }

            match self.output.position().await {
                Ok(position) => {
                    let position_ms = millis(position);
                    trace!(epoch = self.epoch, position_ms, "Position sampled");
                    if !self.report(Sample::Position(position_ms)) {
                        break;
                    }
                }
                Err(err) => {
                    debug!(error = %err, "Position sampling stopped");
                    break;
                }
            }
        }

        debug!(epoch = self.epoch, "Poller finished");
    }
}
