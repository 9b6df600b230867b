use bridge_traits::error::BridgeError;
use core_playback::PlaybackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The playback session has stopped; there is nothing to bind to.
    #[error("Playback session is not running")]
    SessionUnavailable,

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl CoreError {
    /// Lift a runtime error, keeping missing capabilities distinguishable.
    pub(crate) fn from_runtime(err: core_runtime::Error) -> Self {
        match err {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            other => CoreError::Runtime(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
