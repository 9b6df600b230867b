//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the playback session crates:
//! - Logging and tracing setup
//! - Player configuration with fail-fast capability checks
//! - The session event bus
//!
//! Nothing here knows about tracks or the controller; `core-playback` and
//! `core-service` build on these pieces.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PlayerConfig, PlayerConfigBuilder};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, PlaybackEvent, SessionEvent};
