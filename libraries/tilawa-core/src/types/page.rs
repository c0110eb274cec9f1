//! Mushaf page numbers

use crate::error::{Result, TilawaError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pages in the Madani mushaf
pub const PAGE_COUNT: u16 = 604;

/// A page of the mushaf (1-604)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct PageNumber(u16);

impl PageNumber {
    /// Create a page number, validating it against the mushaf length
    pub fn new(page: u16) -> Result<Self> {
        if (1..=PAGE_COUNT).contains(&page) {
            Ok(Self(page))
        } else {
            Err(TilawaError::InvalidPage(page))
        }
    }

    /// Get the inner page number
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for PageNumber {
    type Error = TilawaError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PageNumber> for u16 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}
