use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the schema on the configured database. Idempotent.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Apply the schema to an open pool.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // One table for every collection; bodies are stored verbatim as JSON.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            collection TEXT NOT NULL,
            body_json TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
