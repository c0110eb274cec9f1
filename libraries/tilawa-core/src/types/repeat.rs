//! Repeat configuration

use serde::{Deserialize, Serialize};

/// Smallest accepted repeat count
pub const MIN_REPEAT_COUNT: u8 = 1;

/// Largest accepted repeat count
pub const MAX_REPEAT_COUNT: u8 = 10;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Play each verse once
    #[default]
    Off,

    /// Repeat each verse in place before moving on
    One,

    /// Repeat the whole selection end-to-end
    All,
}

/// Repeat mode plus how many times to play
///
/// `count` is clamped to `1..=10` on every construction path, including
/// deserialization, so an out-of-range value can never be applied or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRepeatConfig")]
pub struct RepeatConfig {
    /// How duplicates are laid out
    pub mode: RepeatMode,
    count: u8,
}

#[derive(Deserialize)]
struct RawRepeatConfig {
    mode: RepeatMode,
    count: i64,
}

impl From<RawRepeatConfig> for RepeatConfig {
    fn from(raw: RawRepeatConfig) -> Self {
        Self::new(raw.mode, raw.count)
    }
}

impl RepeatConfig {
    /// Create a repeat configuration, clamping `count` to `1..=10`
    pub fn new(mode: RepeatMode, count: i64) -> Self {
        Self {
            mode,
            count: clamp_count(count),
        }
    }

    /// Repeat count (always within `1..=10`)
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Replace the count, clamping to `1..=10`
    pub fn with_count(self, count: i64) -> Self {
        Self::new(self.mode, count)
    }

    /// Replace the mode, keeping the count
    pub fn with_mode(self, mode: RepeatMode) -> Self {
        Self { mode, ..self }
    }

    /// Whether expansion would duplicate anything
    pub fn is_active(&self) -> bool {
        self.mode != RepeatMode::Off && self.count > 1
    }
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            mode: RepeatMode::Off,
            count: MIN_REPEAT_COUNT,
        }
    }
}

/// Clamp an arbitrary repeat count into `1..=10`
pub fn clamp_count(count: i64) -> u8 {
    count.clamp(i64::from(MIN_REPEAT_COUNT), i64::from(MAX_REPEAT_COUNT)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_count() {
        assert_eq!(RepeatConfig::new(RepeatMode::One, 15).count(), 10);
        assert_eq!(RepeatConfig::new(RepeatMode::One, 0).count(), 1);
        assert_eq!(RepeatConfig::new(RepeatMode::All, -3).count(), 1);
        assert_eq!(RepeatConfig::new(RepeatMode::All, 4).count(), 4);
    }

    #[test]
    fn active_only_with_mode_and_count() {
        assert!(!RepeatConfig::default().is_active());
        assert!(!RepeatConfig::new(RepeatMode::Off, 5).is_active());
        assert!(!RepeatConfig::new(RepeatMode::One, 1).is_active());
        assert!(RepeatConfig::new(RepeatMode::All, 2).is_active());
    }

    #[test]
    fn deserialization_clamps() {
        let config: RepeatConfig =
            serde_json::from_str(r#"{"mode":"one","count":42}"#).unwrap();
        assert_eq!(config.mode, RepeatMode::One);
        assert_eq!(config.count(), 10);
    }
}
