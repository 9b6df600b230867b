//! # Playback Session Controller
//!
//! A single actor task owns the audio output, the working catalog and the
//! session state. [`PlaybackController`] handles are cheap clones that send
//! commands to it and await an acknowledgement.
//!
//! ## Architecture
//!
//! ```text
//!  PlaybackController ──Command + ack──▶ ┌──────────────┐
//!  PlaybackController ──Command + ack──▶ │ SessionActor │──▶ AudioOutput
//!                                        │              │──▶ MediaNotifier
//!  prepare tasks ───────LoadReady──────▶ │  (one task)  │──▶ EventBus
//!  DurationPoller ──────PollReport─────▶ └──────┬───────┘
//!                                               │ publish
//!                                               ▼
//!                                  watch channels (snapshot + fields)
//! ```
//!
//! Commands are processed strictly in order. Completions of background work
//! carry the load generation (and for the poller, its epoch) they belong to;
//! anything from an older generation is dropped, so the loaded resource and
//! the published current track can never disagree while playing.

use crate::catalog::{Catalog, Direction, Track, TrackId};
use crate::error::{PlaybackError, Result};
use crate::notification::NowPlayingPresenter;
use crate::poller::{millis, DurationPoller, PollReport, Sample};
use crate::state::{SessionObservers, SessionPhase, SessionSnapshot, StatePublisher};
use bridge_traits::notification::MediaAction;
use bridge_traits::playback::{AudioHandle, AudioOutput, AudioOutputFactory};
use core_async::sync::{mpsc, oneshot, watch};
use core_async::task;
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, SessionEvent};
use core_runtime::logging::strip_path;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

type Ack = oneshot::Sender<Result<()>>;

enum Command {
    PlayPause(Ack),
    Advance(Direction, Ack),
    Select(TrackId, Ack),
    StartPolling(Ack),
    SetCatalog(Catalog, Ack),
    Shutdown(Ack),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::PlayPause(_) => "play_pause",
            Command::Advance(Direction::Next, _) => "next",
            Command::Advance(Direction::Previous, _) => "previous",
            Command::Select(_, _) => "select_track",
            Command::StartPolling(_) => "start_duration_polling",
            Command::SetCatalog(_, _) => "set_catalog",
            Command::Shutdown(_) => "shutdown",
        }
    }
}

/// Completion of an asynchronous prepare.
struct LoadReady {
    generation: u64,
    result: bridge_traits::error::Result<()>,
}

/// Handle to a running playback session.
///
/// Dropping the last handle shuts the session down.
#[derive(Clone)]
pub struct PlaybackController {
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<StatePublisher>,
    catalog: watch::Receiver<Catalog>,
    events: EventBus,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("running", &self.is_running())
            .field("phase", &self.state.current().phase)
            .finish()
    }
}

impl PlaybackController {
    /// Spawn the session actor on the current runtime.
    ///
    /// The session starts `Idle` on the first catalog track with nothing
    /// loaded.
    pub fn spawn(catalog: Catalog, config: &PlayerConfig, events: EventBus) -> Self {
        let initial = SessionSnapshot::initial(&catalog);
        let state = Arc::new(StatePublisher::new(&initial));
        let (catalog_tx, catalog_rx) = watch::channel(catalog.clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();

        let actor = SessionActor {
            catalog,
            catalog_tx,
            session: initial,
            output: None,
            generation: 0,
            factory: Arc::clone(&config.audio_output_factory),
            presenter: NowPlayingPresenter::new(Arc::clone(&config.media_notifier)),
            poller: DurationPoller::new(config.position_poll_interval),
            state: Arc::clone(&state),
            events: events.clone(),
            loads_tx,
            reports_tx,
        };

        task::spawn(actor.run(commands_rx, loads_rx, reports_rx));

        Self {
            commands: commands_tx,
            state,
            catalog: catalog_rx,
            events,
        }
    }

    async fn request(&self, command: impl FnOnce(Ack) -> Command) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(command(ack))
            .map_err(|_| PlaybackError::SessionStopped)?;
        done.await.map_err(|_| PlaybackError::SessionStopped)?
    }

    /// Toggle playback. From `Idle` the current track is loaded first.
    pub async fn play_pause(&self) -> Result<()> {
        self.request(Command::PlayPause).await
    }

    /// Move the cursor one step and start loading the new track.
    pub async fn advance(&self, direction: Direction) -> Result<()> {
        self.request(|ack| Command::Advance(direction, ack)).await
    }

    pub async fn next(&self) -> Result<()> {
        self.advance(Direction::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.advance(Direction::Previous).await
    }

    /// Jump to the track with `id` and start loading it.
    pub async fn select_track(&self, id: TrackId) -> Result<()> {
        self.request(|ack| Command::Select(id, ack)).await
    }

    /// (Re)start position sampling. Any previous poller is cancelled.
    pub async fn start_duration_polling(&self) -> Result<()> {
        self.request(Command::StartPolling).await
    }

    /// Replace the working catalog, keeping the current track if present.
    pub async fn set_catalog(&self, catalog: Catalog) -> Result<()> {
        self.request(|ack| Command::SetCatalog(catalog, ack)).await
    }

    /// Route a host media action to the matching command.
    pub async fn dispatch(&self, action: MediaAction) -> Result<()> {
        match action {
            MediaAction::Previous => self.previous().await,
            MediaAction::Next => self.next().await,
            MediaAction::PlayPause => self.play_pause().await,
        }
    }

    /// Stop the session. Later commands fail with
    /// [`PlaybackError::SessionStopped`].
    pub async fn shutdown(&self) -> Result<()> {
        self.request(Command::Shutdown).await
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn observe(&self) -> SessionObservers {
        self.state.observers()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The working catalog.
    pub fn catalog(&self) -> Catalog {
        self.catalog.borrow().clone()
    }

    /// Tracks after the current one in wrap-around order.
    pub fn upcoming(&self) -> Vec<Track> {
        let cursor = self.state.current().current_index;
        self.catalog.borrow().upcoming(cursor)
    }
}

struct SessionActor {
    catalog: Catalog,
    catalog_tx: watch::Sender<Catalog>,
    session: SessionSnapshot,
    /// Output bound to the current load, if one was allocated.
    output: Option<Arc<dyn AudioOutput>>,
    /// Bumped on every load; older completions are stale.
    generation: u64,
    factory: Arc<dyn AudioOutputFactory>,
    presenter: NowPlayingPresenter,
    poller: DurationPoller,
    state: Arc<StatePublisher>,
    events: EventBus,
    loads_tx: mpsc::UnboundedSender<LoadReady>,
    reports_tx: mpsc::UnboundedSender<PollReport>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut loads: mpsc::UnboundedReceiver<LoadReady>,
        mut reports: mpsc::UnboundedReceiver<PollReport>,
    ) {
        info!(tracks = self.catalog.len(), "Playback session started");

        loop {
            core_async::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if self.handle(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        debug!("All controller handles dropped");
                        self.stop().await;
                        break;
                    }
                },
                Some(ready) = loads.recv() => self.on_load_ready(ready).await,
                Some(report) = reports.recv() => self.on_poll_report(report),
            }
        }
    }

    async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        debug!(command = command.name(), "Processing command");
        match command {
            Command::PlayPause(ack) => {
                self.play_pause().await;
                let _ = ack.send(Ok(()));
            }
            Command::Advance(direction, ack) => {
                let index = self.catalog.step(self.session.current_index, direction);
                self.begin_load(index).await;
                let _ = ack.send(Ok(()));
            }
            Command::Select(id, ack) => {
                let result = match self.catalog.position_of(&id) {
                    Some(index) => {
                        self.begin_load(index).await;
                        Ok(())
                    }
                    None => Err(PlaybackError::TrackNotFound(id)),
                };
                let _ = ack.send(result);
            }
            Command::StartPolling(ack) => {
                self.restart_polling();
                let _ = ack.send(Ok(()));
            }
            Command::SetCatalog(catalog, ack) => {
                self.replace_catalog(catalog);
                let _ = ack.send(Ok(()));
            }
            Command::Shutdown(ack) => {
                self.stop().await;
                let _ = ack.send(Ok(()));
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn publish(&self) {
        self.state.publish(&self.session);
    }

    fn emit(&self, event: CoreEvent) {
        // No subscriber is not an error.
        self.events.emit(event).ok();
    }

    fn track_id(&self) -> String {
        self.session.current_track.id.to_string()
    }

    fn emit_error(&self, message: String) {
        self.emit(CoreEvent::Playback(PlaybackEvent::Error {
            track_id: Some(self.track_id()),
            message,
            recoverable: true,
        }));
    }

    async fn refresh_notification(&mut self) {
        if let Some(event) = self.presenter.refresh(&self.session).await {
            self.emit(CoreEvent::Session(event));
        }
        self.session.is_foreground = self.presenter.is_foreground();
    }

    fn restart_polling(&mut self) {
        let Some(output) = self.output.clone() else {
            debug!("No output loaded; polling not started");
            return;
        };
        self.poller.restart(
            output,
            self.generation,
            self.state.playing(),
            self.reports_tx.clone(),
        );
    }

    async fn release_output(&mut self) {
        if let Some(output) = self.output.take() {
            if let Err(err) = output.release().await {
                warn!(error = %err, "Failed to release audio output");
            }
        }
    }

    /// Release the current output and allocate a fresh one.
    async fn fresh_output(&mut self) -> Option<Arc<dyn AudioOutput>> {
        self.release_output().await;
        match self.factory.create() {
            Ok(output) => {
                self.output = Some(Arc::clone(&output));
                Some(output)
            }
            Err(err) => {
                warn!(error = %err, "Failed to allocate audio output");
                self.emit_error(format!("Failed to allocate audio output: {}", err));
                None
            }
        }
    }

    async fn play_pause(&mut self) {
        match self.session.phase {
            SessionPhase::Playing => self.pause().await,
            SessionPhase::Paused => self.resume().await,
            SessionPhase::Idle => self.load_and_play().await,
            SessionPhase::Loading => debug!("play_pause ignored while loading"),
            SessionPhase::Stopped => {}
        }
    }

    async fn pause(&mut self) {
        let Some(output) = self.output.clone() else {
            return;
        };
        if let Err(err) = output.pause().await {
            warn!(error = %err, "Failed to pause output");
            self.emit_error(format!("Failed to pause: {}", err));
            return;
        }
        self.poller.cancel();

        if let Ok(position) = output.position().await {
            self.session.position_ms = self.clamp_position(millis(position));
        }
        self.session.is_playing = false;
        self.session.phase = SessionPhase::Paused;
        self.refresh_notification().await;
        self.publish();

        self.emit(CoreEvent::Playback(PlaybackEvent::Paused {
            track_id: self.track_id(),
            position_ms: self.session.position_ms,
        }));
    }

    async fn resume(&mut self) {
        let Some(output) = self.output.clone() else {
            return;
        };
        if let Err(err) = output.start().await {
            warn!(error = %err, "Failed to resume output");
            self.emit_error(format!("Failed to resume: {}", err));
            return;
        }

        self.session.is_playing = true;
        self.session.phase = SessionPhase::Playing;
        self.refresh_notification().await;
        self.publish();
        self.restart_polling();

        self.emit(CoreEvent::Playback(PlaybackEvent::Resumed {
            track_id: self.track_id(),
            position_ms: self.session.position_ms,
        }));
    }

    /// First play of the current track: prepare in place, then start.
    async fn load_and_play(&mut self) {
        self.generation += 1;
        let Some(output) = self.fresh_output().await else {
            return;
        };

        let audio = self.session.current_track.audio.clone();
        let result = output.prepare(&audio).await;
        self.finish_load(output, &audio, result).await;
    }

    /// Move the cursor to `index` and prepare its audio in the background.
    #[instrument(skip(self))]
    async fn begin_load(&mut self, index: usize) {
        self.poller.cancel();
        self.generation += 1;

        let Some(track) = self.catalog.get(index).cloned() else {
            return;
        };
        self.session.current_index = Some(index);
        self.session.current_track = track.clone();
        self.session.position_ms = 0;
        self.session.duration_ms = 0;
        self.session.is_playing = false;
        self.session.phase = SessionPhase::Loading;

        let output = self.fresh_output().await;
        if output.is_none() {
            self.session.phase = SessionPhase::Idle;
        }
        self.publish();

        self.emit(CoreEvent::Playback(PlaybackEvent::TrackChanged {
            track_id: track.id.to_string(),
            title: track.name.clone(),
            index: Some(index),
        }));

        let Some(output) = output else {
            return;
        };

        info!(track = %track.name, file = strip_path(track.audio.as_str()), "Loading track");
        let generation = self.generation;
        let loads = self.loads_tx.clone();
        task::spawn(async move {
            let result = output.prepare(&track.audio).await;
            let _ = loads.send(LoadReady { generation, result });
        });
    }

    async fn on_load_ready(&mut self, ready: LoadReady) {
        if ready.generation != self.generation {
            debug!(
                stale = ready.generation,
                current = self.generation,
                "Discarding stale load completion"
            );
            return;
        }
        let Some(output) = self.output.clone() else {
            return;
        };
        let audio = self.session.current_track.audio.clone();
        self.finish_load(output, &audio, ready.result).await;
    }

    async fn finish_load(
        &mut self,
        output: Arc<dyn AudioOutput>,
        audio: &AudioHandle,
        prepared: bridge_traits::error::Result<()>,
    ) {
        let started = match prepared {
            Ok(()) => output.start().await,
            Err(err) => Err(err),
        };

        if let Err(err) = started {
            warn!(
                file = strip_path(audio.as_str()),
                error = %err,
                "Failed to load track"
            );
            self.session.is_playing = false;
            self.session.phase = SessionPhase::Idle;
            self.publish();
            self.emit_error(format!("Failed to load {}: {}", strip_path(audio.as_str()), err));
            return;
        }

        if let Ok(duration) = output.duration().await {
            self.session.duration_ms = millis(duration);
        }
        self.session.is_playing = true;
        self.session.phase = SessionPhase::Playing;
        self.refresh_notification().await;
        self.publish();
        self.restart_polling();

        info!(track = %self.session.current_track.name, "Playback started");
        self.emit(CoreEvent::Playback(PlaybackEvent::Started {
            track_id: self.track_id(),
            title: self.session.current_track.name.clone(),
        }));
    }

    fn clamp_position(&self, position_ms: u64) -> u64 {
        if self.session.duration_ms > 0 {
            position_ms.min(self.session.duration_ms)
        } else {
            position_ms
        }
    }

    fn on_poll_report(&mut self, report: PollReport) {
        if report.epoch != self.poller.epoch() || report.generation != self.generation {
            return;
        }

        match report.sample {
            Sample::Duration(duration_ms) => {
                self.session.duration_ms = duration_ms;
                self.publish();
            }
            Sample::Position(position_ms) => {
                if !self.session.is_playing {
                    return;
                }
                self.session.position_ms = self.clamp_position(position_ms);
                self.publish();
                self.emit(CoreEvent::Playback(PlaybackEvent::PositionChanged {
                    track_id: self.track_id(),
                    position_ms: self.session.position_ms,
                    duration_ms: self.session.duration_ms,
                }));
            }
        }
    }

    fn replace_catalog(&mut self, catalog: Catalog) {
        let current = self.session.current_track.id;
        self.session.current_index = catalog.position_of(&current);
        self.catalog = catalog;
        self.catalog_tx.send_replace(self.catalog.clone());
        self.publish();

        let cursor_retained = self.session.current_index.is_some();
        info!(
            tracks = self.catalog.len(),
            cursor_retained, "Catalog replaced"
        );
        self.emit(CoreEvent::Session(SessionEvent::CatalogReplaced {
            track_count: self.catalog.len(),
            cursor_retained,
        }));
    }

    async fn stop(&mut self) {
        self.poller.cancel();
        self.generation += 1;
        self.release_output().await;
        self.presenter.retract().await;

        self.session.is_playing = false;
        self.session.is_foreground = false;
        self.session.phase = SessionPhase::Stopped;
        self.publish();

        info!("Playback session stopped");
        self.emit(CoreEvent::Session(SessionEvent::Stopped));
    }
}
