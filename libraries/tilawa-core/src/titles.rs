//! Track title formatting

use crate::traits::TitleFormatter;
use crate::types::{surah::surah_name, VerseRef};

/// English titles: `"Al-Baqarah 2:255"`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTitles;

impl TitleFormatter for EnglishTitles {
    fn title(&self, verse: VerseRef) -> String {
        match surah_name(verse.sura()) {
            Some(name) => format!("{} {}", name, verse),
            None => format!("Surah {}", verse),
        }
    }
}

/// Titles with Eastern Arabic digits: `"Al-Baqarah ٢:٢٥٥"`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArabicNumeralTitles;

impl TitleFormatter for ArabicNumeralTitles {
    fn title(&self, verse: VerseRef) -> String {
        let numbers = format!(
            "{}:{}",
            to_arabic_digits(verse.sura()),
            to_arabic_digits(verse.ayah())
        );
        match surah_name(verse.sura()) {
            Some(name) => format!("{} {}", name, numbers),
            None => numbers,
        }
    }
}

fn to_arabic_digits(n: u16) -> String {
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}
