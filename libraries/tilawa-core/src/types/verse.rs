//! Verse identity

use crate::error::{Result, TilawaError};
use crate::types::surah::{ayah_count, SURAH_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single verse, identified by surah and ayah number
///
/// Always refers to a verse that exists in the surah table; construct it with
/// [`VerseRef::new`] or by parsing a `"sura:ayah"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseRef {
    sura: u16,
    ayah: u16,
}

impl VerseRef {
    /// First verse of the mushaf (Al-Fatihah 1:1)
    pub const FIRST: Self = Self { sura: 1, ayah: 1 };

    /// Create a verse reference, validating it against the surah table
    pub fn new(sura: u16, ayah: u16) -> Result<Self> {
        let valid = (1..=SURAH_COUNT).contains(&sura)
            && ayah_count(sura).is_some_and(|count| (1..=count).contains(&ayah));

        if valid {
            Ok(Self { sura, ayah })
        } else {
            Err(TilawaError::InvalidVerse { sura, ayah })
        }
    }

    /// Surah number (1-114)
    pub fn sura(&self) -> u16 {
        self.sura
    }

    /// Ayah number within the surah
    pub fn ayah(&self) -> u16 {
        self.ayah
    }

    /// Stable `"sura:ayah"` key used as track identity
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl Default for VerseRef {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sura, self.ayah)
    }
}

impl FromStr for VerseRef {
    type Err = TilawaError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TilawaError::InvalidVerseKey(s.to_string());

        let (sura, ayah) = s.trim().split_once(':').ok_or_else(invalid)?;
        let sura = sura.parse::<u16>().map_err(|_| invalid())?;
        let ayah = ayah.parse::<u16>().map_err(|_| invalid())?;

        Self::new(sura, ayah)
    }
}

impl TryFrom<String> for VerseRef {
    type Error = TilawaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VerseRef> for String {
    fn from(verse: VerseRef) -> Self {
        verse.key()
    }
}
