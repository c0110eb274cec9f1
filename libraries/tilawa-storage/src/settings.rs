//! Settings table queries
//!
//! Settings are key-value pairs; values arrive already JSON-encoded and are
//! stored verbatim.
//!
//! # Example
//!
//! ```rust,no_run
//! use tilawa_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, "recitation.speed", "1.25").await?;
//! let speed = settings::get_setting(pool, "recitation.speed").await?;
//! assert_eq!(speed.as_deref(), Some("1.25"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// Stored setting row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredSetting {
    /// Setting key
    pub key: String,
    /// Raw stored value (JSON text)
    pub value: String,
}

/// Get a single setting value
///
/// Returns `Ok(None)` if the key was never written.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Insert or overwrite a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value)
         VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Every stored setting, ordered by key
pub async fn get_all_settings(pool: &SqlitePool) -> Result<Vec<StoredSetting>> {
    let rows = sqlx::query_as::<_, StoredSetting>("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
