//! Design and alert pass-through services.
//!
//! Both record kinds are persisted verbatim through a [`DocumentStore`]; the
//! only interpretation is the optional `userId` / `sneakerId` list filter.

use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::info;

use sneakpeak_core::models::{NewAlert, NewDesign, ALERT_COLLECTION, DESIGN_COLLECTION};
use sneakpeak_core::store::{DocumentStore, FilterMap};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Optional list filters shared by designs and alerts.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerFilter {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub sneaker_id: Option<String>,
}

impl OwnerFilter {
    /// Exact-equality filter map; empty values are skipped.
    pub fn to_filter_map(&self) -> FilterMap {
        let mut filter = FilterMap::new();
        if let Some(user_id) = self.user_id.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("userId".to_string(), json!(user_id));
        }
        if let Some(sneaker_id) = self.sneaker_id.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("sneakerId".to_string(), json!(sneaker_id));
        }
        filter
    }
}

pub async fn save_design(store: &dyn DocumentStore, design: NewDesign) -> Result<String> {
    let id = store
        .create_document(DESIGN_COLLECTION, serde_json::to_value(&design)?)
        .await?;
    info!(%id, sneaker_id = %design.sneaker_id, "design saved");
    Ok(id)
}

pub async fn list_designs(store: &dyn DocumentStore, filter: &OwnerFilter) -> Result<Vec<Value>> {
    store
        .get_documents(DESIGN_COLLECTION, &filter.to_filter_map())
        .await
}

pub async fn create_alert(store: &dyn DocumentStore, alert: NewAlert) -> Result<String> {
    if let Some(price) = alert.target_price {
        if price < 0.0 {
            bail!("invalid targetPrice: must be >= 0");
        }
    }
    let id = store
        .create_document(ALERT_COLLECTION, serde_json::to_value(&alert)?)
        .await?;
    info!(%id, sneaker_id = %alert.sneaker_id, kind = %alert.kind, "alert created");
    Ok(id)
}

pub async fn list_alerts(store: &dyn DocumentStore, filter: &OwnerFilter) -> Result<Vec<Value>> {
    store
        .get_documents(ALERT_COLLECTION, &filter.to_filter_map())
        .await
}

/// CLI entry point for `designs list`.
pub async fn run_list_designs(config: &Config, filter: &OwnerFilter) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let docs = list_designs(&store, filter).await;
    store.pool().close().await;
    println!("{}", serde_json::to_string_pretty(&docs?)?);
    Ok(())
}

/// CLI entry point for `alerts list`.
pub async fn run_list_alerts(config: &Config, filter: &OwnerFilter) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let docs = list_alerts(&store, filter).await;
    store.pool().close().await;
    println!("{}", serde_json::to_string_pretty(&docs?)?);
    Ok(())
}
