//! # Playback Session Demo
//!
//! Walks a five-track catalog through the session state machine using the
//! desktop bridges: a clocked output with a fixed track length and a
//! notifier that logs every now-playing payload.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_desktop::{ClockedAudioOutputFactory, TracingNotifier};
use core_playback::{Catalog, PlaybackController, Result, Track};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use core_runtime::logging::{init_logging, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;

fn catalog() -> Result<Catalog> {
    Catalog::new(vec![
        Track::new(
            "Ik Mulaqaat",
            "Altamash Faridi",
            "raw/ik_mulaqaat.mp3",
            "drawable/ik_mulaqaat.png",
        ),
        Track::new("Kabira", "Tochi Raina", "raw/kabira.mp3", "drawable/kabira.png"),
        Track::new(
            "Monta Re",
            "Amitabh Bhattacharya",
            "raw/monta_re.mp3",
            "drawable/monta_re.png",
        ),
        Track::new(
            "Nazm Nazm",
            "Arko Pravo Mukherjee",
            "raw/nazm_nazm.mp3",
            "drawable/nazm_nazm.png",
        ),
        Track::new(
            "Naina Da Kya Kasoor",
            "Amit Trivedi",
            "raw/naina_da_kya_kasoor.mp3",
            "drawable/naina.png",
        ),
    ])
}

#[core_async::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default())?;

    let config = PlayerConfig::builder()
        .audio_output_factory(Arc::new(ClockedAudioOutputFactory::with_fixed_duration(
            Duration::from_secs(5),
        )))
        .media_notifier(Arc::new(TracingNotifier::new()))
        .position_poll_interval(Duration::from_millis(500))
        .build()?;

    let events = EventBus::new(config.event_buffer_size);
    let mut feed = events.subscribe();
    core_async::spawn(async move {
        while let Ok(event) = feed.recv().await {
            if let CoreEvent::Playback(PlaybackEvent::PositionChanged { .. }) = event {
                continue;
            }
            println!("event: {}", event.description());
        }
    });

    let controller = PlaybackController::spawn(catalog()?, &config, events);
    let mut position = controller.observe().position_ms;

    println!("Playing {}", controller.snapshot().current_track.name);
    controller.play_pause().await?;
    core_async::sleep(Duration::from_secs(2)).await;
    println!("  position: {} ms", *position.borrow_and_update());

    controller.play_pause().await?;
    println!("Paused at {} ms", controller.snapshot().position_ms);

    for _ in 0..3 {
        controller.next().await?;
        let mut state = controller.subscribe();
        let playing = state.wait_for(|s| s.is_playing).await?.current_track.name.clone();
        println!("Now playing {}", playing);
        core_async::sleep(Duration::from_secs(1)).await;
    }

    println!("Up next:");
    for track in controller.upcoming() {
        println!("  - {} ({})", track.name, track.description);
    }

    controller.shutdown().await?;
    println!("Session phase: {:?}", controller.snapshot().phase);
    Ok(())
}
