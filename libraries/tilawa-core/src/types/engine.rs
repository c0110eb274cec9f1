//! Audio engine state and events

use serde::{Deserialize, Serialize};

/// Playback condition reported by the audio engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Audio is sounding
    Playing,

    /// Paused or stopped
    Paused,

    /// Loading audio; counts as playing for the mini-player
    Buffering,
}

impl EngineState {
    /// Whether the session should show as playing
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::Buffering)
    }
}

/// Events emitted by the external audio engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Playback state changed
    StateChanged(EngineState),

    /// The engine moved to another physical queue position
    ActiveTrackChanged(usize),

    /// The engine reached the end of its queue
    QueueEnded,
}
