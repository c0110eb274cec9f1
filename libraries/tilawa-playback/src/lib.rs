//! Tilawa - Recitation Playback
//!
//! Turns a verse selection (a mushaf page, a highlighted range, or a single
//! verse) into an ordered, possibly repeated audio queue, keeps one external
//! audio engine in sync with it, and navigates by verse rather than by raw
//! queue position.
//!
//! This crate provides:
//! - Track building (one track per verse with audio, in selection order)
//! - Repeat expansion (Off, One, All; count 1-10)
//! - Grouped navigation (next/previous skip repeated copies as one verse)
//! - Playback session state (single writer, engine events win)
//! - Settings persistence (reciter, repeat, speed)
//!
//! # Architecture
//!
//! `tilawa-playback` decodes no audio and performs no HTTP. The audio engine,
//! recitation resolver, verse database, and key-value storage are supplied
//! through the traits in `tilawa-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tilawa_core::{EnglishTitles, MemoryStore, StaticVerseIndex, VerseRef};
//! use tilawa_playback::{Collaborators, PlaybackConfig, RecitationPlayer};
//!
//! let (player, _task) = RecitationPlayer::start(
//!     PlaybackConfig::default(),
//!     Collaborators {
//!         engine: Arc::new(my_engine),
//!         resolver: Arc::new(my_resolver),
//!         verse_index: Arc::new(StaticVerseIndex::new()),
//!         titles: Arc::new(EnglishTitles),
//!         store: Arc::new(MemoryStore::new()),
//!     },
//! )
//! .await;
//!
//! // Forward engine callbacks
//! let sink = player.event_sink();
//!
//! // Ayat al-Kursi, each verse twice
//! player.set_repeat_mode(tilawa_core::RepeatMode::One).await?;
//! player.set_repeat_count(2).await?;
//! player.play_single("2:255".parse()?, None).await?;
//! player.skip_to_next().await?;
//! ```

pub mod builder;
mod error;
pub mod navigator;
mod player;
pub mod repeat;
pub mod session;
pub mod settings;
pub mod types;

// Public exports
pub use builder::TrackBuilder;
pub use error::{PlaybackError, Result};
pub use player::{Collaborators, EngineEventSink, RecitationPlayer};
pub use repeat::expand;
pub use session::{PlaybackSession, SessionState};
pub use settings::{PersistedSettings, SettingsStore};
pub use types::{clamp_speed, PlayOutcome, PlaybackConfig, Selection};
