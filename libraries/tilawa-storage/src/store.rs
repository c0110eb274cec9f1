//! `SQLite`-backed [`KeyValueStore`]

use async_trait::async_trait;
use sqlx::SqlitePool;
use tilawa_core::KeyValueStore;
use tracing::debug;

use crate::error::Result;
use crate::settings::{self, StoredSetting};
use crate::{create_pool, run_migrations};

/// Durable settings storage in a `SQLite` database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database and bring its schema up to date
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        debug!(database_url, "Settings store ready");
        Ok(Self { pool })
    }

    /// Wrap an existing pool whose schema is already migrated
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Every stored setting, ordered by key
    pub async fn entries(&self) -> Result<Vec<StoredSetting>> {
        settings::get_all_settings(&self.pool).await
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> tilawa_core::Result<Option<String>> {
        Ok(settings::get_setting(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> tilawa_core::Result<()> {
        settings::set_setting(&self.pool, key, value).await?;
        Ok(())
    }
}
