//! In-memory [`DocumentStore`] implementation for tests.
//!
//! Collections are `Vec`s of `(id, body)` pairs behind a
//! `std::sync::RwLock`, so listing returns insertion order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{matches_filter, prepare_document, with_id, DocumentStore, FilterMap};

type Collections = BTreeMap<String, Vec<(String, Map<String, Value>)>>;

/// In-memory document store.
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_document(&self, collection: &str, document: Value) -> Result<String> {
        let body = prepare_document(document)?;
        let id = uuid::Uuid::new_v4().to_string();
        let mut guard = self
            .collections
            .write()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        guard
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), body));
        Ok(id)
    }

    async fn get_documents(&self, collection: &str, filter: &FilterMap) -> Result<Vec<Value>> {
        let guard = self
            .collections
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        let docs = match guard.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        Ok(docs
            .iter()
            .filter(|(_, body)| matches_filter(body, filter))
            .map(|(id, body)| with_id(body.clone(), id))
            .collect())
    }

    async fn collections(&self) -> Result<Vec<String>> {
        let guard = self
            .collections
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(guard.keys().cloned().collect())
    }
}
