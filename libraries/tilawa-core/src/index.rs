//! In-memory page-to-verse table

use crate::error::Result;
use crate::traits::VerseIndex;
use crate::types::{PageNumber, VerseRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page table loaded up front (e.g. from a bundled JSON file)
///
/// Pages missing from the table have no verses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticVerseIndex {
    pages: HashMap<PageNumber, Vec<VerseRef>>,
}

impl StaticVerseIndex {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the verses printed on a page
    pub fn insert(&mut self, page: PageNumber, verses: Vec<VerseRef>) {
        self.pages.insert(page, verses);
    }

    /// Parse a JSON object mapping page numbers to `"sura:ayah"` keys
    ///
    /// ```json
    /// { "1": ["1:1", "1:2"], "604": ["112:1"] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<u16, Vec<VerseRef>> = serde_json::from_str(json)?;
        let mut index = Self::new();
        for (page, verses) in raw {
            index.insert(PageNumber::new(page)?, verses);
        }
        Ok(index)
    }

    /// Number of pages in the table
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the table has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl VerseIndex for StaticVerseIndex {
    async fn verses_on_page(&self, page: PageNumber) -> Result<Vec<VerseRef>> {
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}
