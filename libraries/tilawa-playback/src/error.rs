//! Error types for playback management

use thiserror::Error;
use tilawa_core::TilawaError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A collaborator (engine, verse index, storage) failed
    #[error(transparent)]
    Core(#[from] TilawaError),

    /// The player task has shut down
    #[error("Player has shut down")]
    PlayerClosed,

    /// The player's message queue is full (non-blocking sends only)
    #[error("Player is busy")]
    Busy,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
