//! SQLite-backed [`DocumentStore`] implementation.
//!
//! Every collection lives in the single `documents` table created by
//! [`migrate`](crate::migrate). Bodies are stored as JSON text and the
//! exact-equality filter is applied after decoding, so stored documents
//! are never reshaped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};

use sneakpeak_core::store::{matches_filter, prepare_document, with_id, DocumentStore, FilterMap};

use crate::config::Config;
use crate::{db, migrate};

/// SQLite implementation of the [`DocumentStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `[db].path` and make sure the schema exists.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::apply(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_document(&self, collection: &str, document: Value) -> Result<String> {
        let body = prepare_document(document)?;
        let id = uuid::Uuid::new_v4().to_string();
        let body_json = serde_json::to_string(&body)?;

        sqlx::query(
            "INSERT INTO documents (id, collection, body_json, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(collection)
        .bind(&body_json)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert into collection '{}'", collection))?;

        Ok(id)
    }

    async fn get_documents(&self, collection: &str, filter: &FilterMap) -> Result<Vec<Value>> {
        let rows = sqlx::query(
            "SELECT id, body_json FROM documents WHERE collection = ? ORDER BY seq ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        let mut docs = Vec::new();
        for row in rows {
            let id: String = row.get("id");
            let body_json: String = row.get("body_json");
            let body: Map<String, Value> = serde_json::from_str(&body_json)
                .with_context(|| format!("Corrupt document body for id {}", id))?;
            if matches_filter(&body, filter) {
                docs.push(with_id(body, &id));
            }
        }
        Ok(docs)
    }

    async fn collections(&self) -> Result<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT collection FROM documents ORDER BY collection")
                .fetch_all(&self.pool)
                .await?;
        Ok(names)
    }
}
