//! URL template recitation resolver
//!
//! Builds audio URLs from a template such as
//! `https://everyayah.com/data/{reciter}/{sura}{ayah}.mp3`. Sura and ayah are
//! zero-padded to three digits, so 2:255 becomes `002255`. Nothing is fetched;
//! whether the URL actually serves audio is the engine's concern.

use async_trait::async_trait;
use tilawa_core::{RecitationResolver, Result, VerseRef};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UrlTemplateResolver {
    template: String,
}

impl UrlTemplateResolver {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Audio URL for a verse, without going through the trait
    pub fn url_for(&self, verse: VerseRef, reciter_id: &str) -> String {
        self.template
            .replace("{reciter}", reciter_id)
            .replace("{sura}", &format!("{:03}", verse.sura()))
            .replace("{ayah}", &format!("{:03}", verse.ayah()))
    }
}

#[async_trait]
impl RecitationResolver for UrlTemplateResolver {
    async fn resolve(&self, verse_key: &str, reciter_id: &str) -> Result<Option<String>> {
        let verse: VerseRef = verse_key.parse()?;

        if reciter_id.trim().is_empty() {
            debug!(verse = %verse, "No reciter selected, no audio");
            return Ok(None);
        }

        Ok(Some(self.url_for(verse, reciter_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVERYAYAH: &str = "https://everyayah.com/data/{reciter}/{sura}{ayah}.mp3";

    #[tokio::test]
    async fn test_resolve_pads_sura_and_ayah() {
        let resolver = UrlTemplateResolver::new(EVERYAYAH);

        let url = resolver.resolve("2:255", "Alafasy_128kbps").await.unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://everyayah.com/data/Alafasy_128kbps/002255.mp3")
        );
    }

    #[tokio::test]
    async fn test_resolve_three_digit_sura() {
        let resolver = UrlTemplateResolver::new("https://cdn/{sura}/{ayah}");

        let url = resolver.resolve("114:6", "any").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://cdn/114/006"));
    }

    #[tokio::test]
    async fn test_empty_reciter_has_no_audio() {
        let resolver = UrlTemplateResolver::new(EVERYAYAH);

        assert_eq!(resolver.resolve("1:1", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_verse_key_is_an_error() {
        let resolver = UrlTemplateResolver::new(EVERYAYAH);

        assert!(resolver.resolve("2:287", "Alafasy_128kbps").await.is_err());
        assert!(resolver.resolve("garbage", "Alafasy_128kbps").await.is_err());
    }
}
