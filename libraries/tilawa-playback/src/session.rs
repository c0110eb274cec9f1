//! Playback session state
//!
//! The single source of truth for what is currently playing. It is owned by
//! the player actor; everything else sees copies published on a watch
//! channel.

use crate::settings::PersistedSettings;
use crate::types::PlaybackConfig;
use serde::{Deserialize, Serialize};
use tilawa_core::{EngineState, Reciter, RepeatConfig, VerseRef};

/// Conceptual player state, derived from session fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing loaded, player hidden
    Idle,

    /// Queue loaded and sounding
    Playing,

    /// Queue loaded, paused
    Paused,
}

/// Mutable playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Whether audio is (or is about to be) sounding
    pub is_playing: bool,

    /// Whether the mini-player should show
    pub is_visible: bool,

    /// Verse of the active physical queue entry
    pub current_verse: VerseRef,

    /// Active position in the engine's physical queue (0 when empty)
    pub current_index: usize,

    /// Reciter used for new play requests
    pub reciter: Reciter,

    /// Repeat configuration applied to new play requests
    pub repeat: RepeatConfig,

    /// Playback rate
    pub speed: f32,
}

impl PlaybackSession {
    /// Create an idle session from configuration defaults
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            is_playing: false,
            is_visible: false,
            current_verse: VerseRef::default(),
            current_index: 0,
            reciter: config.default_reciter.clone(),
            repeat: config.repeat,
            speed: config.speed,
        }
    }

    /// Current conceptual state
    pub fn state(&self) -> SessionState {
        match (self.is_visible, self.is_playing) {
            (false, _) => SessionState::Idle,
            (true, true) => SessionState::Playing,
            (true, false) => SessionState::Paused,
        }
    }

    /// Display name of the selected reciter
    pub fn reciter_name(&self) -> &str {
        &self.reciter.name
    }

    /// Seed preferences loaded from durable storage
    pub fn apply_settings(&mut self, settings: PersistedSettings) {
        self.reciter = settings.reciter;
        self.repeat = settings.repeat;
        self.speed = settings.speed;
    }

    /// Preferences to persist
    pub fn settings(&self) -> PersistedSettings {
        PersistedSettings {
            reciter: self.reciter.clone(),
            repeat: self.repeat,
            speed: self.speed,
        }
    }

    /// A new queue was loaded and started from its first entry
    pub fn on_loaded(&mut self, first: VerseRef) {
        self.is_playing = true;
        self.is_visible = true;
        self.current_verse = first;
        self.current_index = 0;
    }

    /// The engine moved to another physical entry
    pub fn on_active_track(&mut self, index: usize, verse: VerseRef) {
        self.current_index = index;
        self.current_verse = verse;
    }

    /// The engine reported its playback condition
    ///
    /// Engine reports win over optimistic local flips while something is
    /// loaded. Reports arriving while idle are stale and ignored; only a play
    /// request makes the player visible.
    pub fn on_engine_state(&mut self, state: EngineState) -> bool {
        if !self.is_visible {
            return false;
        }
        self.is_playing = state.is_playing();
        true
    }

    /// Return to the idle form, keeping preferences
    pub fn reset(&mut self) {
        self.is_playing = false;
        self.is_visible = false;
        self.current_verse = VerseRef::default();
        self.current_index = 0;
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
