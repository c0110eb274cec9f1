//! Core types for playback management

use serde::{Deserialize, Serialize};
use tilawa_core::{PageNumber, Reciter, RepeatConfig, VerseRef};

/// Slowest accepted playback rate
pub const MIN_SPEED: f32 = 0.5;

/// Fastest accepted playback rate
pub const MAX_SPEED: f32 = 2.0;

/// Normal playback rate
pub const DEFAULT_SPEED: f32 = 1.0;

/// What the user asked to hear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Every verse printed on a mushaf page
    Page(PageNumber),

    /// An ad-hoc ordered range (e.g. from highlighting)
    Verses(Vec<VerseRef>),

    /// One tapped verse
    Single(VerseRef),
}

/// Result of a play request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// The queue was loaded and playback started
    Started {
        /// First resolved verse
        verse: VerseRef,
        /// Number of logical tracks (distinct verse entries)
        tracks: usize,
        /// Number of physical queue entries after repetition
        queue_len: usize,
    },

    /// No verse resolved to audio; nothing changed
    NothingToPlay,

    /// A newer play request replaced this one before it finished building
    Superseded,
}

/// Configuration for the recitation player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Reciter used until the user picks one (default: Alafasy)
    pub default_reciter: Reciter,

    /// Initial repeat configuration (default: off)
    pub repeat: RepeatConfig,

    /// Initial playback rate (default: 1.0)
    pub speed: f32,

    /// Capacity of the player's message queue (default: 64)
    pub command_buffer: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_reciter: Reciter::default(),
            repeat: RepeatConfig::default(),
            speed: DEFAULT_SPEED,
            command_buffer: 64,
        }
    }
}

/// Clamp a playback rate into `[0.5, 2.0]`
///
/// Returns `None` for NaN or infinite input, which must be ignored rather
/// than applied.
pub fn clamp_speed(speed: f32) -> Option<f32> {
    speed.is_finite().then(|| speed.clamp(MIN_SPEED, MAX_SPEED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.repeat, RepeatConfig::default());
        assert_eq!(config.command_buffer, 64);
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(clamp_speed(1.25), Some(1.25));
        assert_eq!(clamp_speed(0.1), Some(MIN_SPEED));
        assert_eq!(clamp_speed(5.0), Some(MAX_SPEED));
        assert_eq!(clamp_speed(f32::NAN), None);
        assert_eq!(clamp_speed(f32::INFINITY), None);
    }
}
