//! Settings persistence
//!
//! Reciter choice and playback preferences are stored as JSON-encoded values
//! under dotted keys in a [`KeyValueStore`]. Reading is lenient: a missing,
//! unreadable, or corrupt value is treated exactly like "never set" and the
//! default stays in place. Writing is fire-and-forget: failures are logged,
//! never returned.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `recitation.reciter_id` | `"Alafasy_128kbps"` |
//! | `recitation.reciter_name` | `"Mishary Rashid Alafasy"` |
//! | `recitation.repeat_mode` | `"off"` / `"one"` / `"all"` |
//! | `recitation.repeat_count` | `1`-`10` |
//! | `recitation.speed` | `0.5`-`2.0` |

use crate::types::{clamp_speed, DEFAULT_SPEED};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tilawa_core::{KeyValueStore, Reciter, RepeatConfig, RepeatMode};
use tracing::{debug, warn};

/// Selected reciter id
pub const SETTING_RECITER_ID: &str = "recitation.reciter_id";

/// Selected reciter display name
pub const SETTING_RECITER_NAME: &str = "recitation.reciter_name";

/// Repeat mode
pub const SETTING_REPEAT_MODE: &str = "recitation.repeat_mode";

/// Repeat count
pub const SETTING_REPEAT_COUNT: &str = "recitation.repeat_count";

/// Playback rate
pub const SETTING_SPEED: &str = "recitation.speed";

/// The persisted subset of the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    pub reciter: Reciter,
    pub repeat: RepeatConfig,
    pub speed: f32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            reciter: Reciter::default(),
            repeat: RepeatConfig::default(),
            speed: DEFAULT_SPEED,
        }
    }
}

/// Reads and writes playback preferences
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    /// Wrap a key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load preferences, keeping `defaults` for anything missing or corrupt
    pub async fn load(&self, defaults: PersistedSettings) -> PersistedSettings {
        let reciter_id = self.read::<String>(SETTING_RECITER_ID).await;
        let reciter_name = self.read::<String>(SETTING_RECITER_NAME).await;
        let mode = self.read::<RepeatMode>(SETTING_REPEAT_MODE).await;
        let count = self.read::<i64>(SETTING_REPEAT_COUNT).await;
        let speed = self.read::<f32>(SETTING_SPEED).await.and_then(clamp_speed);

        let settings = PersistedSettings {
            reciter: Reciter {
                id: reciter_id.unwrap_or(defaults.reciter.id),
                name: reciter_name.unwrap_or(defaults.reciter.name),
            },
            repeat: RepeatConfig::new(
                mode.unwrap_or(defaults.repeat.mode),
                count.unwrap_or_else(|| i64::from(defaults.repeat.count())),
            ),
            speed: speed.unwrap_or(defaults.speed),
        };

        debug!(
            reciter = %settings.reciter.id,
            repeat_mode = ?settings.repeat.mode,
            repeat_count = settings.repeat.count(),
            speed = settings.speed,
            "Loaded playback settings"
        );
        settings
    }

    /// Persist the selected reciter
    pub async fn save_reciter(&self, reciter: &Reciter) {
        self.write(SETTING_RECITER_ID, &reciter.id).await;
        self.write(SETTING_RECITER_NAME, &reciter.name).await;
    }

    /// Persist the repeat configuration
    pub async fn save_repeat(&self, repeat: RepeatConfig) {
        self.write(SETTING_REPEAT_MODE, &repeat.mode).await;
        self.write(SETTING_REPEAT_COUNT, &repeat.count()).await;
    }

    /// Persist the playback rate
    pub async fn save_speed(&self, speed: f32) {
        self.write(SETTING_SPEED, &speed).await;
    }

    /// Persist everything
    pub async fn save(&self, settings: &PersistedSettings) {
        self.save_reciter(&settings.reciter).await;
        self.save_repeat(settings.repeat).await;
        self.save_speed(settings.speed).await;
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Failed to read setting, using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, value = %raw, error = %e, "Ignoring corrupt setting");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode setting");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &encoded).await {
            warn!(key, error = %e, "Failed to persist setting");
        }
    }
}
