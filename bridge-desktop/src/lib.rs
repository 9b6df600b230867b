//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `AudioOutput` / `AudioOutputFactory` using a wall-clock driven output
//!   whose durations are probed from local files with `lofty`
//! - `MediaNotifier` that reports the now-playing payload through `tracing`
//! - `LifecycleObserver` that stays in the foreground until the shell reports
//!   otherwise
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ClockedAudioOutputFactory, TracingNotifier};
//! use std::sync::Arc;
//!
//! let factory = Arc::new(ClockedAudioOutputFactory::new());
//! let notifier = Arc::new(TracingNotifier::new());
//! // Hand both to `PlayerConfig::builder()`
//! ```

mod audio;
mod lifecycle;
mod notifier;

pub use audio::{ClockedAudioOutput, ClockedAudioOutputFactory, DurationProbe};
pub use lifecycle::DesktopLifecycleObserver;
pub use notifier::TracingNotifier;
