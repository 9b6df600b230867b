//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host must implement for the music
//! session core.
//!
//! ## Overview
//!
//! The playback core owns the session state machine, but the pieces that
//! touch the device live on the host side of this boundary:
//!
//! ### Playback
//! - [`AudioOutput`](playback::AudioOutput) - A single-use audio output bound to one source
//! - [`AudioOutputFactory`](playback::AudioOutputFactory) - Allocates fresh outputs per load
//!
//! ### Session Surface
//! - [`MediaNotifier`](notification::MediaNotifier) - Persistent now-playing notification / foreground announcement
//! - [`MediaAction`](notification::MediaAction) - Transport actions delivered out-of-band (`previous`, `next`, `play_pause`)
//! - [`LifecycleObserver`](lifecycle::LifecycleObserver) - Host task/UI lifecycle transitions
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | Android  | TBD                 | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert platform errors into it and include the offending handle or action
//! in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! through `Arc` with the controller task and its background poller.

pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod notification;
pub mod platform;
pub mod playback;

pub use error::BridgeError;

// Re-export commonly used types
pub use lifecycle::{LifecycleChangeStream, LifecycleObserver, LifecycleState};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use notification::{MediaAction, MediaNotifier, NowPlayingNotification, PlayPauseIcon};
pub use playback::{ArtworkHandle, AudioHandle, AudioOutput, AudioOutputFactory};
