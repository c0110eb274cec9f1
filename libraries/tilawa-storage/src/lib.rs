//! Tilawa Storage
//!
//! `SQLite` persistence for recitation preferences.
//!
//! # Example
//!
//! ```rust,no_run
//! use tilawa_core::KeyValueStore;
//! use tilawa_storage::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::connect("sqlite://tilawa.db").await?;
//! store.set("recitation.speed", "1.25").await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod settings;
mod store;

pub use error::{Result, StorageError};
pub use store::SqliteStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the first query.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://tilawa.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!(database_url, "Created SQLite pool");
    Ok(pool)
}
