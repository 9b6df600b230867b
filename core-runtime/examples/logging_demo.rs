//! Logging setup demonstration
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example logging_demo
//! cargo run -p core-runtime --example logging_demo -- json
//! cargo run -p core-runtime --example logging_demo -- compact "core_playback=trace"
//! ```

use bridge_traits::logging::LogLevel;
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, info, instrument, span, trace, warn, Level};

#[core_async::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace);
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(err) = init_logging(config) {
        eprintln!("failed to initialize logging: {err}");
        return;
    }

    info!(format = ?format, "Logging initialized");

    let tracks = [
        "/home/sam/Music/ik_mulaqaat.mp3",
        "/home/sam/Music/kabira.mp3",
        "/home/sam/Music/monta_re.mp3",
    ];

    let session = span!(Level::INFO, "session", tracks = tracks.len());
    let _enter = session.enter();

    for (index, path) in tracks.iter().enumerate() {
        load_track(index, path).await;
    }

    warn!(command = "next", "Command dropped while disconnected");
    info!("Demo complete");
}

#[instrument(skip(path), fields(file = %strip_path(path)))]
async fn load_track(index: usize, path: &str) {
    debug!("Preparing source");
    core_async::sleep(core_async::Duration::from_millis(5)).await;
    trace!(position_ms = 0u64, duration_ms = 215_000u64, "Position tick");
    info!("Track ready");
}
