//! Track builder
//!
//! Turns a verse selection into logical tracks, one per verse that has audio
//! for the chosen reciter, in selection order.

use crate::error::Result;
use crate::types::Selection;
use std::sync::Arc;
use tilawa_core::{LogicalTrack, RecitationResolver, Reciter, TitleFormatter, VerseIndex, VerseRef};
use tracing::{debug, warn};

/// Resolves verse selections into playable tracks
///
/// Resolver calls are issued one verse at a time, so tracks come back in
/// request order and the resolver never sees a burst of parallel lookups.
pub struct TrackBuilder {
    resolver: Arc<dyn RecitationResolver>,
    verse_index: Arc<dyn VerseIndex>,
    titles: Arc<dyn TitleFormatter>,
}

impl TrackBuilder {
    /// Create a builder over the given collaborators
    pub fn new(
        resolver: Arc<dyn RecitationResolver>,
        verse_index: Arc<dyn VerseIndex>,
        titles: Arc<dyn TitleFormatter>,
    ) -> Self {
        Self {
            resolver,
            verse_index,
            titles,
        }
    }

    /// Expand a selection into the ordered verses it covers
    pub async fn verses_for(&self, selection: &Selection) -> Result<Vec<VerseRef>> {
        match selection {
            Selection::Page(page) => Ok(self.verse_index.verses_on_page(*page).await?),
            Selection::Verses(verses) => Ok(verses.clone()),
            Selection::Single(verse) => Ok(vec![*verse]),
        }
    }

    /// Build tracks for a selection
    ///
    /// An empty result is not an error: callers treat it as "nothing to play".
    pub async fn build(&self, selection: &Selection, reciter: &Reciter) -> Result<Vec<LogicalTrack>> {
        let verses = self.verses_for(selection).await?;
        Ok(self.build_verses(&verses, reciter).await)
    }

    /// Build tracks for an explicit verse list
    ///
    /// Verses without audio, or whose lookup fails, are dropped with a warning.
    pub async fn build_verses(&self, verses: &[VerseRef], reciter: &Reciter) -> Vec<LogicalTrack> {
        let mut tracks = Vec::with_capacity(verses.len());

        for verse in verses {
            let key = verse.key();
            match self.resolver.resolve(&key, &reciter.id).await {
                Ok(Some(url)) if !url.trim().is_empty() => {
                    tracks.push(LogicalTrack::new(
                        *verse,
                        url,
                        self.titles.title(*verse),
                        reciter.name.clone(),
                    ));
                }
                Ok(_) => {
                    warn!(verse = %key, reciter = %reciter.id, "No recitation audio for verse, skipping");
                }
                Err(e) => {
                    warn!(
                        verse = %key,
                        reciter = %reciter.id,
                        error = %e,
                        "Recitation lookup failed, skipping verse"
                    );
                }
            }
        }

        debug!(
            requested = verses.len(),
            resolved = tracks.len(),
            reciter = %reciter.id,
            "Built recitation tracks"
        );
        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tilawa_core::{EnglishTitles, PageNumber, StaticVerseIndex, TilawaError};

    /// Resolver that knows a fixed set of verses and records every lookup
    struct FixedResolver {
        available: Vec<&'static str>,
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FixedResolver {
        fn new(available: Vec<&'static str>) -> Self {
            Self {
                available,
                failing: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RecitationResolver for FixedResolver {
        async fn resolve(&self, verse_key: &str, reciter_id: &str) -> tilawa_core::Result<Option<String>> {
            self.calls.lock().unwrap().push(verse_key.to_string());
            if self.failing.contains(&verse_key) {
                return Err(TilawaError::resolver("connection reset"));
            }
            Ok(self
                .available
                .contains(&verse_key)
                .then(|| format!("https://cdn.example/{}/{}.mp3", reciter_id, verse_key)))
        }
    }

    fn verse(key: &str) -> VerseRef {
        key.parse().unwrap()
    }

    fn builder(resolver: Arc<FixedResolver>, index: StaticVerseIndex) -> TrackBuilder {
        TrackBuilder::new(resolver, Arc::new(index), Arc::new(EnglishTitles))
    }

    #[tokio::test]
    async fn builds_in_request_order() {
        let resolver = Arc::new(FixedResolver::new(vec!["1:1", "1:2", "1:3"]));
        let builder = builder(Arc::clone(&resolver), StaticVerseIndex::new());
        let reciter = Reciter::new("husary", "Mahmoud Khalil Al-Husary");

        let selection = Selection::Verses(vec![verse("1:3"), verse("1:1"), verse("1:2")]);
        let tracks = builder.build(&selection, &reciter).await.unwrap();

        let keys: Vec<_> = tracks.iter().map(|t| t.verse_key.as_str()).collect();
        assert_eq!(keys, vec!["1:3", "1:1", "1:2"]);
        assert_eq!(tracks[0].title, "Al-Fatihah 1:3");
        assert_eq!(tracks[0].artist, "Mahmoud Khalil Al-Husary");
        assert_eq!(tracks[0].audio_url, "https://cdn.example/husary/1:3.mp3");
        assert_eq!(*resolver.calls.lock().unwrap(), vec!["1:3", "1:1", "1:2"]);
    }

    #[tokio::test]
    async fn drops_missing_and_failed_verses() {
        let mut resolver = FixedResolver::new(vec!["2:255", "2:257"]);
        resolver.failing.push("2:256");
        let builder = builder(Arc::new(resolver), StaticVerseIndex::new());

        let selection = Selection::Verses(vec![verse("2:254"), verse("2:255"), verse("2:256"), verse("2:257")]);
        let tracks = builder.build(&selection, &Reciter::default()).await.unwrap();

        let keys: Vec<_> = tracks.iter().map(|t| t.verse_key.as_str()).collect();
        assert_eq!(keys, vec!["2:255", "2:257"]);
    }

    #[tokio::test]
    async fn single_verse_without_audio_builds_nothing() {
        let builder = builder(Arc::new(FixedResolver::new(vec![])), StaticVerseIndex::new());

        let tracks = builder
            .build(&Selection::Single(verse("2:255")), &Reciter::default())
            .await
            .unwrap();

        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn page_selection_reads_the_verse_index() {
        let page = PageNumber::new(604).unwrap();
        let mut index = StaticVerseIndex::new();
        index.insert(page, vec![verse("112:1"), verse("112:2")]);
        let builder = builder(Arc::new(FixedResolver::new(vec!["112:1", "112:2"])), index);

        let tracks = builder.build(&Selection::Page(page), &Reciter::default()).await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title, "Al-Ikhlas 112:2");
    }
}
