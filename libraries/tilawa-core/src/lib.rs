//! Tilawa Core
//!
//! Platform-agnostic types, collaborator traits, and error handling for the
//! Tilawa recitation player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `VerseRef`, `LogicalTrack`, `RepeatConfig`, `Reciter`, `PageNumber`
//! - **Collaborator Traits**: `RecitationResolver`, `AudioEngine`, `VerseIndex`,
//!   `TitleFormatter`, `KeyValueStore`
//! - **Error Handling**: Unified `TilawaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tilawa_core::{LogicalTrack, RepeatConfig, RepeatMode, VerseRef};
//!
//! let verse: VerseRef = "2:255".parse().unwrap();
//! let track = LogicalTrack::new(verse, "https://cdn.example/002255.mp3", "Al-Baqarah 2:255", "Alafasy");
//! assert_eq!(track.verse_key, "2:255");
//!
//! // Repeat counts are clamped to 1..=10
//! assert_eq!(RepeatConfig::new(RepeatMode::One, 15).count(), 10);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod storage;
pub mod titles;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TilawaError};
pub use index::StaticVerseIndex;
pub use storage::{KeyValueStore, MemoryStore};
pub use titles::{ArabicNumeralTitles, EnglishTitles};
pub use traits::{AudioEngine, RecitationResolver, TitleFormatter, VerseIndex};
pub use types::{
    EngineEvent, EngineState, LogicalTrack, PageNumber, Reciter, RepeatConfig, RepeatMode,
    VerseRef,
};
