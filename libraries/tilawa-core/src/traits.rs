/// Collaborator traits for Tilawa
///
/// These are the seams between the playback core and the outside world: the
/// remote recitation lookup, the platform audio engine, and the verse
/// database. Implementations live in applications (or test fakes).
use crate::error::Result;
use crate::types::{LogicalTrack, PageNumber, VerseRef};
use async_trait::async_trait;
use std::time::Duration;

/// Looks up the audio file for one verse by one reciter
#[async_trait]
pub trait RecitationResolver: Send + Sync {
    /// Resolve a playable audio URL
    ///
    /// # Returns
    /// * `Ok(Some(url))` - audio is available
    /// * `Ok(None)` - this reciter has no recording of the verse
    /// * `Err(_)` - lookup failed (treated like `Ok(None)` by the track builder)
    async fn resolve(&self, verse_key: &str, reciter_id: &str) -> Result<Option<String>>;
}

/// External audio playback engine
///
/// The engine owns the physical queue once it has been loaded. Events flow
/// back through `EngineEventSink` in `tilawa-playback`.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Stop playback and empty the queue
    async fn reset(&self) -> Result<()>;

    /// Append tracks to the queue
    async fn add(&self, tracks: Vec<LogicalTrack>) -> Result<()>;

    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Seek within the active track
    async fn seek_to(&self, position: Duration) -> Result<()>;

    /// Set the playback rate (1.0 = normal speed)
    async fn set_rate(&self, rate: f32) -> Result<()>;

    /// Jump to a physical queue position
    async fn skip(&self, index: usize) -> Result<()>;

    /// Turn off the engine's own loop flag
    ///
    /// Repetition is realized by duplicating queue entries, so the engine must
    /// never loop on its own.
    async fn disable_repeat(&self) -> Result<()>;

    /// Snapshot of the live physical queue
    async fn queue(&self) -> Result<Vec<LogicalTrack>>;
}

/// Verse database reads needed to play a whole page
#[async_trait]
pub trait VerseIndex: Send + Sync {
    /// Verses printed on a mushaf page, in reading order
    async fn verses_on_page(&self, page: PageNumber) -> Result<Vec<VerseRef>>;
}

/// Formats localized track titles
pub trait TitleFormatter: Send + Sync {
    /// Title for a verse's track
    fn title(&self, verse: VerseRef) -> String;
}
