//! Workspace façade crate.
//!
//! Host applications depend on `music-session-workspace` and get the playback
//! session service plus the catalog types without wiring each workspace crate
//! individually. The `desktop-shims` feature (default) pulls in the desktop
//! bridge implementations.

#[cfg(feature = "desktop-shims")]
pub use core_playback::{
    Catalog, Direction, PlaybackController, PlaybackError, SessionObservers, SessionPhase,
    SessionSnapshot, Track, TrackId,
};
#[cfg(feature = "desktop-shims")]
pub use core_service::{
    CoreError, Favorites, PlayerService, PresentationState, SessionBridge,
};
