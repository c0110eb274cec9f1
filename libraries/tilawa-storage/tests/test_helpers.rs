//! Test helpers for storage integration tests
//!
//! Databases are real SQLite files in a temporary directory, so WAL mode and
//! migrations behave as in production.

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;
use tilawa_storage::SqliteStore;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub store: SqliteStore,
    pub url: String,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new migrated test database
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = db_url(&temp_dir.path().join("test.db"));

        let store = SqliteStore::connect(&url)
            .await
            .expect("Failed to open settings store");

        Self {
            store,
            url,
            _temp_dir: temp_dir,
        }
    }

    /// Open a second, independent connection to the same file
    pub async fn reopen(&self) -> SqliteStore {
        SqliteStore::connect(&self.url)
            .await
            .expect("Failed to reopen settings store")
    }
}

pub fn db_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}
