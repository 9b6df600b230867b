//! # Playback Session Module
//!
//! Owns the playback session of a single listener: which track is current,
//! whether it is playing, how far it has progressed and how long it is.
//!
//! ## Overview
//!
//! This module handles:
//! - The ordered, wrap-around [`Catalog`] of tracks
//! - The [`PlaybackController`] actor that serializes every transport command
//! - Position/duration sampling while a track plays
//! - The now-playing notification payload and its foreground lifecycle
//!
//! ## Example
//!
//! ```ignore
//! use core_playback::{Catalog, PlaybackController, Track};
//! use core_runtime::{EventBus, PlayerConfig};
//!
//! let catalog = Catalog::new(vec![Track::new("Kabira", "Tochi Raina", "raw/kabira", "art/kabira")])?;
//! let config = PlayerConfig::builder().build()?;
//! let controller = PlaybackController::spawn(catalog, &config, EventBus::default());
//!
//! controller.play_pause().await?;
//! controller.next().await?;
//! ```

pub mod catalog;
pub mod controller;
pub mod error;
pub mod notification;
mod poller;
pub mod state;

pub use catalog::{Catalog, Direction, Track, TrackId};
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use notification::build_notification;
pub use state::{SessionObservers, SessionPhase, SessionSnapshot};
