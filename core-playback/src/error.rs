//! # Playback Error Types

use crate::catalog::TrackId;
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Catalog Errors
    // ========================================================================
    /// A catalog needs at least one track.
    #[error("Catalog must contain at least one track")]
    EmptyCatalog,

    /// Two catalog entries share an id.
    #[error("Duplicate track in catalog: {0}")]
    DuplicateTrack(TrackId),

    /// No track with this id exists in the working catalog.
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// The session actor has terminated; no further commands are accepted.
    #[error("Playback session stopped")]
    SessionStopped,

    /// Error reported by a host bridge.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` if a later attempt at the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::Bridge(BridgeError::SourceUnavailable(_))
                | PlaybackError::Bridge(BridgeError::NotAvailable(_))
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
