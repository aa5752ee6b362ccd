//! SQLite connection setup for the document store.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use crate::config::Config;

/// Open a pool on `[db].path`, creating the file and its parent directory
/// if needed.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    connect_at(&config.db.path).await
}

pub async fn connect_at(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    debug!(path = %db_path.display(), "database pool opened");
    Ok(pool)
}
