//! Logical recitation tracks

use crate::error::Result;
use crate::types::VerseRef;
use serde::{Deserialize, Serialize};

/// One verse's recitation audio, ready for the audio engine
///
/// `verse_key` is the identity used to recover logical verse boundaries once
/// the track has been duplicated for repetition. It is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalTrack {
    /// `"sura:ayah"` key of the recited verse
    pub verse_key: String,

    /// Playable audio URL returned by the recitation resolver
    pub audio_url: String,

    /// Localized display title
    pub title: String,

    /// Reciter display name
    pub artist: String,
}

impl LogicalTrack {
    /// Create a track for a verse
    pub fn new(
        verse: VerseRef,
        audio_url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            verse_key: verse.key(),
            audio_url: audio_url.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Parse the verse this track recites
    pub fn verse(&self) -> Result<VerseRef> {
        self.verse_key.parse()
    }

    /// Whether two tracks recite the same verse
    pub fn same_verse(&self, other: &Self) -> bool {
        self.verse_key == other.verse_key
    }
}
