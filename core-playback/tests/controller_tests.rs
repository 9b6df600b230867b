//! Integration tests for the playback session controller
//!
//! This test suite verifies:
//! - Transport commands and the session state machine
//! - Cursor arithmetic through the actor
//! - Position polling (one live poller, restarts on resume)
//! - Stale load completions and load failures
//! - Catalog replacement, shutdown and handle drop

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::notification::{
    MediaAction, MediaNotifier, NowPlayingNotification, PlayPauseIcon,
};
use bridge_traits::playback::{AudioHandle, AudioOutput, AudioOutputFactory};
use core_playback::{
    Catalog, PlaybackController, PlaybackError, SessionPhase, SessionSnapshot, Track, TrackId,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, SessionEvent};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout, Instant};

const TRACK_DURATION: Duration = Duration::from_secs(240);

// ============================================================================
// Fake AudioOutput
// ============================================================================

/// Behaviour and call log shared by every output a factory hands out.
#[derive(Default)]
struct Script {
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<HashSet<String>>,
    created: AtomicUsize,
    released: AtomicUsize,
    position_calls: AtomicUsize,
    started: Mutex<Vec<String>>,
}

impl Script {
    fn delay(&self, source: &AudioHandle, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(source.as_str().to_string(), delay);
    }

    fn fail(&self, source: &AudioHandle) {
        self.failing
            .lock()
            .unwrap()
            .insert(source.as_str().to_string());
    }

    fn heal(&self, source: &AudioHandle) {
        self.failing.lock().unwrap().remove(source.as_str());
    }

    fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FakeState {
    source: Option<String>,
    started_at: Option<Instant>,
    played: Duration,
}

struct FakeOutput {
    script: Arc<Script>,
    state: Mutex<FakeState>,
}

impl FakeOutput {
    fn elapsed(state: &FakeState) -> Duration {
        let running = state
            .started_at
            .map(|at| at.elapsed())
            .unwrap_or_default();
        (state.played + running).min(TRACK_DURATION)
    }
}

#[async_trait]
impl AudioOutput for FakeOutput {
    async fn prepare(&self, source: &AudioHandle) -> BridgeResult<()> {
        let delay = self
            .script
            .delays
            .lock()
            .unwrap()
            .get(source.as_str())
            .copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        if self.script.failing.lock().unwrap().contains(source.as_str()) {
            return Err(BridgeError::SourceUnavailable(source.to_string()));
        }
        self.state.lock().unwrap().source = Some(source.as_str().to_string());
        Ok(())
    }

    async fn start(&self) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        let source = state
            .source
            .clone()
            .ok_or_else(|| BridgeError::OperationFailed("not prepared".into()))?;
        if state.started_at.is_none() {
            state.started_at = Some(Instant::now());
        }
        self.script.started.lock().unwrap().push(source);
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        state.played = Self::elapsed(&state);
        state.started_at = None;
        Ok(())
    }

    async fn position(&self) -> BridgeResult<Duration> {
        self.script.position_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::elapsed(&self.state.lock().unwrap()))
    }

    async fn duration(&self) -> BridgeResult<Duration> {
        Ok(TRACK_DURATION)
    }

    async fn is_playing(&self) -> bool {
        self.state.lock().unwrap().started_at.is_some()
    }

    async fn release(&self) -> BridgeResult<()> {
        self.script.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeFactory {
    script: Arc<Script>,
}

impl AudioOutputFactory for FakeFactory {
    fn create(&self) -> BridgeResult<Arc<dyn AudioOutput>> {
        self.script.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeOutput {
            script: Arc::clone(&self.script),
            state: Mutex::new(FakeState::default()),
        }))
    }
}

// ============================================================================
// Recording MediaNotifier
// ============================================================================

#[derive(Default)]
struct RecordingNotifier {
    calls: Mutex<Vec<&'static str>>,
    last: Mutex<Option<NowPlayingNotification>>,
}

impl RecordingNotifier {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn last_icon(&self) -> Option<PlayPauseIcon> {
        self.last.lock().unwrap().as_ref().map(|n| n.play_pause_icon)
    }
}

#[async_trait]
impl MediaNotifier for RecordingNotifier {
    async fn start_foreground(&self, notification: NowPlayingNotification) -> BridgeResult<()> {
        self.calls.lock().unwrap().push("start");
        *self.last.lock().unwrap() = Some(notification);
        Ok(())
    }

    async fn update(&self, notification: NowPlayingNotification) -> BridgeResult<()> {
        self.calls.lock().unwrap().push("update");
        *self.last.lock().unwrap() = Some(notification);
        Ok(())
    }

    async fn stop_foreground(&self) -> BridgeResult<()> {
        self.calls.lock().unwrap().push("stop");
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    controller: PlaybackController,
    catalog: Catalog,
    script: Arc<Script>,
    notifier: Arc<RecordingNotifier>,
    events: EventBus,
}

fn tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|name| {
            Track::new(
                *name,
                "Various Artists",
                format!("raw/{}.mp3", name),
                format!("art/{}.png", name),
            )
        })
        .collect()
}

fn harness(names: &[&str]) -> Harness {
    let catalog = Catalog::new(tracks(names)).unwrap();
    let script = Arc::new(Script::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let config = PlayerConfig::builder()
        .audio_output_factory(Arc::new(FakeFactory {
            script: Arc::clone(&script),
        }))
        .media_notifier(notifier.clone())
        .build()
        .unwrap();
    let events = EventBus::new(1_024);
    let controller = PlaybackController::spawn(catalog.clone(), &config, events.clone());

    Harness {
        controller,
        catalog,
        script,
        notifier,
        events,
    }
}

async fn wait_until<F>(controller: &PlaybackController, predicate: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    let mut rx = controller.subscribe();
    let snapshot = timeout(Duration::from_secs(60), rx.wait_for(|s| predicate(s)))
        .await
        .expect("timed out waiting for session state")
        .expect("session state channel closed")
        .clone();
    snapshot
}

async fn wait_for_phase(controller: &PlaybackController, phase: SessionPhase) -> SessionSnapshot {
    wait_until(controller, |s| s.phase == phase).await
}

async fn next_matching<F>(rx: &mut broadcast::Receiver<CoreEvent>, predicate: F) -> CoreEvent
where
    F: Fn(&CoreEvent) -> bool,
{
    timeout(Duration::from_secs(60), async {
        loop {
            match rx.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

// ============================================================================
// Initial state and play/pause
// ============================================================================

#[tokio::test(start_paused = true)]
async fn starts_idle_on_first_track() {
    let h = harness(&["a", "b", "c"]);
    let snapshot = h.controller.snapshot();

    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.current_track.name, "a");
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert!(!snapshot.is_playing);
    assert!(!snapshot.is_foreground);
    assert_eq!((snapshot.position_ms, snapshot.duration_ms), (0, 0));
    assert_eq!(h.script.created.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn play_from_idle_loads_and_starts() {
    let h = harness(&["a", "b"]);
    let mut events = h.events.subscribe();

    h.controller.play_pause().await.unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert!(snapshot.is_playing);
    assert!(snapshot.is_foreground);
    assert_eq!(snapshot.duration_ms, 240_000);
    assert_eq!(h.script.started(), vec!["raw/a.mp3"]);
    assert_eq!(h.notifier.calls(), vec!["start"]);
    assert_eq!(h.notifier.last_icon(), Some(PlayPauseIcon::Pause));

    let started = next_matching(&mut events, |e| {
        matches!(e, CoreEvent::Playback(PlaybackEvent::Started { .. }))
    })
    .await;
    assert_eq!(
        started,
        CoreEvent::Playback(PlaybackEvent::Started {
            track_id: h.catalog.first().id.to_string(),
            title: "a".to_string(),
        })
    );
}

#[tokio::test(start_paused = true)]
async fn play_pause_twice_restores_playing_and_keeps_position() {
    let h = harness(&["a", "b"]);
    h.controller.play_pause().await.unwrap();
    sleep(Duration::from_secs(3)).await;

    h.controller.play_pause().await.unwrap();
    let paused = h.controller.snapshot();
    assert_eq!(paused.phase, SessionPhase::Paused);
    assert!(!paused.is_playing);
    assert_eq!(paused.position_ms, 3_000);
    assert_eq!(h.notifier.last_icon(), Some(PlayPauseIcon::Play));

    h.controller.play_pause().await.unwrap();
    let resumed = h.controller.snapshot();
    assert_eq!(resumed.phase, SessionPhase::Playing);
    assert!(resumed.is_playing);
    assert_eq!(resumed.position_ms, 3_000);
    assert_eq!(h.notifier.calls(), vec!["start", "update", "update"]);

    // Resume in place: same output, no reload.
    assert_eq!(h.script.created.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn position_advances_after_resume() {
    let h = harness(&["a"]);
    h.controller.play_pause().await.unwrap();
    sleep(Duration::from_millis(2_500)).await;
    h.controller.play_pause().await.unwrap();
    h.controller.play_pause().await.unwrap();

    let snapshot = wait_until(&h.controller, |s| s.position_ms >= 4_500).await;
    assert!(snapshot.is_playing);
    assert!(snapshot.position_ms <= snapshot.duration_ms);
}

// ============================================================================
// Cursor movement
// ============================================================================

#[tokio::test(start_paused = true)]
async fn n_nexts_return_to_start() {
    let names = ["a", "b", "c", "d", "e"];
    let h = harness(&names);

    for step in 1..=names.len() {
        h.controller.next().await.unwrap();
        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.current_index, Some(step % names.len()));
    }

    let snapshot = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert_eq!(snapshot.current_track.name, "a");
}

#[tokio::test(start_paused = true)]
async fn previous_inverts_next() {
    let h = harness(&["a", "b", "c"]);

    h.controller.previous().await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(2));

    h.controller.next().await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(0));
}

#[tokio::test(start_paused = true)]
async fn concurrent_handles_are_serialized() {
    let h = harness(&["a", "b", "c", "d"]);
    let handles: Vec<_> = (0..7).map(|_| h.controller.clone()).collect();

    let results = join_all(handles.iter().map(|handle| handle.next())).await;
    assert!(results.iter().all(Result::is_ok));

    let snapshot = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert_eq!(snapshot.current_index, Some(7 % 4));
    assert_eq!(snapshot.current_track.name, "d");
}

#[tokio::test(start_paused = true)]
async fn advance_resets_timing_then_plays_loaded_track() {
    let h = harness(&["a", "b", "c"]);
    h.controller.play_pause().await.unwrap();
    sleep(Duration::from_secs(3)).await;
    h.controller.play_pause().await.unwrap();
    let slow = h.catalog.get(1).unwrap().audio.clone();
    h.script.delay(&slow, Duration::from_secs(1));

    h.controller.next().await.unwrap();
    let loading = h.controller.snapshot();
    assert_eq!(loading.phase, SessionPhase::Loading);
    assert_eq!(loading.current_index, Some(1));
    assert_eq!((loading.position_ms, loading.duration_ms), (0, 0));
    assert!(!loading.is_playing);

    // Ends playing even though the session was paused before.
    let playing = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert!(playing.is_playing);
    assert_eq!(playing.current_track.name, "b");
    assert_eq!(h.script.started().last().map(String::as_str), Some("raw/b.mp3"));
    assert_eq!(h.script.released.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn three_track_walkthrough() {
    let h = harness(&["A", "B", "C"]);

    h.controller.next().await.unwrap();
    h.controller.next().await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.current_index, Some(2));
    assert_eq!(snapshot.position_ms, 0);

    h.controller.previous().await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(1));

    let snapshot = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert_eq!(snapshot.current_track.name, "B");

    let fresh = harness(&["A", "B", "C"]);
    fresh.controller.play_pause().await.unwrap();
    let snapshot = fresh.controller.snapshot();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.current_track.name, "A");
}

#[tokio::test(start_paused = true)]
async fn select_track_jumps_by_id() {
    let h = harness(&["a", "b", "c"]);
    let target = h.catalog.get(2).unwrap().clone();

    h.controller.select_track(target.id).await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(2));

    let snapshot = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert_eq!(snapshot.current_track, target);
}

#[tokio::test(start_paused = true)]
async fn select_unknown_track_leaves_state_unchanged() {
    let h = harness(&["a", "b"]);
    let before = h.controller.snapshot();
    let missing = TrackId::new();

    let err = h.controller.select_track(missing).await.unwrap_err();
    assert!(matches!(err, PlaybackError::TrackNotFound(id) if id == missing));
    assert_eq!(h.controller.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn dispatch_routes_media_actions() {
    let h = harness(&["a", "b", "c"]);

    h.controller.dispatch(MediaAction::Next).await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(1));

    h.controller.dispatch(MediaAction::Previous).await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, Some(0));

    wait_for_phase(&h.controller, SessionPhase::Playing).await;
    h.controller.dispatch(MediaAction::PlayPause).await.unwrap();
    assert_eq!(h.controller.snapshot().phase, SessionPhase::Paused);
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test(start_paused = true)]
async fn stale_load_completion_is_ignored() {
    let h = harness(&["a", "b", "c"]);
    let slow = h.catalog.get(1).unwrap().audio.clone();
    h.script.delay(&slow, Duration::from_secs(5));

    h.controller.next().await.unwrap();
    h.controller.next().await.unwrap();

    let playing = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert_eq!(playing.current_track.name, "c");

    // Let the slow prepare for "b" finish.
    sleep(Duration::from_secs(10)).await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.current_track.name, "c");
    assert!(snapshot.is_playing);
    assert_eq!(h.script.started(), vec!["raw/c.mp3"]);
}

#[tokio::test(start_paused = true)]
async fn play_pause_is_ignored_while_loading() {
    let h = harness(&["a", "b"]);
    let slow = h.catalog.get(1).unwrap().audio.clone();
    h.script.delay(&slow, Duration::from_secs(2));

    h.controller.next().await.unwrap();
    h.controller.play_pause().await.unwrap();
    assert_eq!(h.controller.snapshot().phase, SessionPhase::Loading);

    let snapshot = wait_for_phase(&h.controller, SessionPhase::Playing).await;
    assert!(snapshot.is_playing);
}

#[tokio::test(start_paused = true)]
async fn load_failure_goes_idle_and_play_retries() {
    let h = harness(&["a", "b"]);
    let broken = h.catalog.get(1).unwrap().audio.clone();
    h.script.fail(&broken);
    let mut events = h.events.subscribe();

    h.controller.next().await.unwrap();
    let snapshot = wait_for_phase(&h.controller, SessionPhase::Idle).await;
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.current_track.name, "b");

    let error = next_matching(&mut events, |e| {
        matches!(e, CoreEvent::Playback(PlaybackEvent::Error { .. }))
    })
    .await;
    assert!(matches!(
        error,
        CoreEvent::Playback(PlaybackEvent::Error { recoverable: true, .. })
    ));

    h.script.heal(&broken);
    h.controller.play_pause().await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(h.script.started(), vec!["raw/b.mp3"]);
}

#[tokio::test(start_paused = true)]
async fn failed_first_play_is_not_an_error() {
    let h = harness(&["a"]);
    h.script.fail(&h.catalog.first().audio);

    h.controller.play_pause().await.unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert!(!snapshot.is_playing);
    assert!(h.notifier.calls().is_empty());
}

// ============================================================================
// Polling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn restarting_polling_keeps_one_live_poller() {
    let h = harness(&["a"]);
    h.controller.play_pause().await.unwrap();
    h.controller.start_duration_polling().await.unwrap();
    h.controller.start_duration_polling().await.unwrap();

    sleep(Duration::from_millis(1_500)).await;
    let before = h.script.position_calls.load(Ordering::SeqCst);
    sleep(Duration::from_secs(5)).await;
    let ticks = h.script.position_calls.load(Ordering::SeqCst) - before;

    assert!((4..=6).contains(&ticks), "got {} ticks", ticks);
}

#[tokio::test(start_paused = true)]
async fn polling_stops_while_paused() {
    let h = harness(&["a"]);
    h.controller.play_pause().await.unwrap();
    sleep(Duration::from_millis(2_500)).await;
    h.controller.play_pause().await.unwrap();

    let before = h.script.position_calls.load(Ordering::SeqCst);
    sleep(Duration::from_secs(5)).await;
    assert_eq!(h.script.position_calls.load(Ordering::SeqCst), before);
}

#[tokio::test(start_paused = true)]
async fn field_observers_follow_the_session() {
    let h = harness(&["a", "b"]);
    let mut observers = h.controller.observe();

    h.controller.play_pause().await.unwrap();
    assert!(*observers.is_playing.borrow_and_update());
    assert_eq!(*observers.duration_ms.borrow_and_update(), 240_000);

    timeout(
        Duration::from_secs(10),
        observers.position_ms.wait_for(|p| *p >= 2_000),
    )
    .await
    .unwrap()
    .unwrap();

    h.controller.next().await.unwrap();
    assert_eq!(observers.current_track.borrow_and_update().name, "b");
    assert_eq!(*observers.position_ms.borrow(), 0);
}

// ============================================================================
// Catalog replacement
// ============================================================================

#[tokio::test(start_paused = true)]
async fn set_catalog_retains_current_track() {
    let h = harness(&["a", "b", "c"]);
    h.controller.next().await.unwrap();
    let current = h.controller.snapshot().current_track;
    let mut events = h.events.subscribe();

    let mut reordered = tracks(&["x"]);
    reordered.extend(h.catalog.iter().rev().cloned());
    h.controller
        .set_catalog(Catalog::new(reordered).unwrap())
        .await
        .unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.current_track, current);
    assert_eq!(snapshot.current_index, Some(2));
    assert_eq!(h.controller.catalog().len(), 4);

    let event = next_matching(&mut events, |e| {
        matches!(e, CoreEvent::Session(SessionEvent::CatalogReplaced { .. }))
    })
    .await;
    assert_eq!(
        event,
        CoreEvent::Session(SessionEvent::CatalogReplaced {
            track_count: 4,
            cursor_retained: true,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn set_catalog_without_current_track_detaches_cursor() {
    let h = harness(&["a", "b"]);
    let replacement = Catalog::new(tracks(&["x", "y", "z"])).unwrap();

    h.controller.set_catalog(replacement.clone()).await.unwrap();
    assert_eq!(h.controller.snapshot().current_index, None);
    assert!(h.controller.upcoming().is_empty());

    h.controller.previous().await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.current_index, Some(2));
    assert_eq!(snapshot.current_track, *replacement.get(2).unwrap());
}

#[tokio::test(start_paused = true)]
async fn upcoming_follows_the_cursor() {
    let h = harness(&["a", "b", "c"]);
    h.controller.next().await.unwrap();

    let names: Vec<_> = h
        .controller
        .upcoming()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["c", "a"]);
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn shutdown_stops_session_and_rejects_commands() {
    let h = harness(&["a", "b"]);
    let mut events = h.events.subscribe();
    h.controller.play_pause().await.unwrap();

    h.controller.shutdown().await.unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Stopped);
    assert!(!snapshot.is_playing);
    assert!(!snapshot.is_foreground);
    assert_eq!(h.notifier.calls().last(), Some(&"stop"));
    assert_eq!(
        h.script.released.load(Ordering::SeqCst),
        h.script.created.load(Ordering::SeqCst)
    );

    next_matching(&mut events, |e| {
        matches!(e, CoreEvent::Session(SessionEvent::Stopped))
    })
    .await;

    assert!(matches!(
        h.controller.play_pause().await,
        Err(PlaybackError::SessionStopped)
    ));
    assert!(matches!(
        h.controller.next().await,
        Err(PlaybackError::SessionStopped)
    ));
    assert!(!h.controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn shutdown_while_loading_never_starts_the_pending_track() {
    let h = harness(&["a", "b"]);
    let slow = h.catalog.get(1).unwrap().audio.clone();
    h.script.delay(&slow, Duration::from_secs(2));

    h.controller.next().await.unwrap();
    assert_eq!(h.controller.snapshot().phase, SessionPhase::Loading);
    h.controller.shutdown().await.unwrap();

    // The prepare for "b" completes after the session stopped.
    sleep(Duration::from_secs(5)).await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Stopped);
    assert!(!snapshot.is_playing);
    assert!(h.script.started().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_shuts_down() {
    let h = harness(&["a"]);
    h.controller.play_pause().await.unwrap();
    let mut rx = h.controller.subscribe();
    let notifier = h.notifier.clone();

    drop(h);

    timeout(
        Duration::from_secs(10),
        rx.wait_for(|s| s.phase == SessionPhase::Stopped),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(notifier.calls().last(), Some(&"stop"));
}
