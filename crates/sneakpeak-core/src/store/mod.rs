//! Document storage abstraction for user-submitted records.
//!
//! The [`DocumentStore`] trait is the persistence seam behind designs and
//! alerts, enabling pluggable backends (SQLite in the application, an
//! in-memory map for tests).
//!
//! Documents are schemaless JSON objects grouped into named collections.
//! Listing filters by exact JSON equality per field; there is no indexing,
//! ordering beyond insertion order, or pagination.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

/// Field under which a listed document carries its generated id.
pub const ID_FIELD: &str = "_id";

/// Exact-equality filter: every entry must equal the document's field.
pub type FilterMap = Map<String, Value>;

/// Abstract document store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create_document`](DocumentStore::create_document) | Persist a document, returning its generated id |
/// | [`get_documents`](DocumentStore::get_documents) | List a collection filtered by exact field equality |
/// | [`collections`](DocumentStore::collections) | Names of collections holding at least one document |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `document` into `collection` and return the generated id.
    async fn create_document(&self, collection: &str, document: Value) -> Result<String>;

    /// Documents in `collection` matching every entry of `filter`, in
    /// insertion order, each stamped with [`ID_FIELD`].
    async fn get_documents(&self, collection: &str, filter: &FilterMap) -> Result<Vec<Value>>;

    /// Collection names currently present in the store.
    async fn collections(&self) -> Result<Vec<String>>;
}

/// Validates `document` is an object and stamps `createdAt` / `updatedAt`.
///
/// Both backends call this before writing, so stored bodies look the same
/// regardless of where they live.
pub fn prepare_document(document: Value) -> Result<Map<String, Value>> {
    let mut obj = match document {
        Value::Object(obj) => obj,
        other => bail!("document must be a JSON object, got {}", json_kind(&other)),
    };
    let now = Value::String(Utc::now().to_rfc3339());
    obj.insert("createdAt".to_string(), now.clone());
    obj.insert("updatedAt".to_string(), now);
    Ok(obj)
}

/// True if every filter entry equals the corresponding document field.
pub fn matches_filter(document: &Map<String, Value>, filter: &FilterMap) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Returns `document` with the id inserted as a string [`ID_FIELD`].
pub fn with_id(mut document: Map<String, Value>, id: &str) -> Value {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    Value::Object(document)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
