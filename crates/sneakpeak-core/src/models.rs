//! Catalog and user-document models.
//!
//! [`SneakerRecord`] is the unit the search engine operates on. Designs and
//! alerts are user-submitted documents persisted through the
//! [`DocumentStore`](crate::store::DocumentStore); the engine only looks at
//! their `userId` / `sneakerId` keys when listing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Tag that marks a record as curated-trending.
pub const TRENDING_TAG: &str = "trending";

/// Collection name for saved designs.
pub const DESIGN_COLLECTION: &str = "design";

/// Collection name for price-drop and restock alerts.
pub const ALERT_COLLECTION: &str = "alert";

/// One product entry in the catalog.
///
/// Only the fields the engine interprets are typed. Everything else in the
/// source document is kept in `extra` and serialized back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SneakerRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colorway: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Secondary-market data. Catalog files key this as `stockx`.
    #[serde(
        default,
        rename = "stockx",
        alias = "market",
        deserialize_with = "null_as_default"
    )]
    pub market: MarketData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SneakerRecord {
    /// Last observed sale price, if known.
    pub fn last_sale(&self) -> Option<f64> {
        self.market.last_sale
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The text `q` searches against: `brand model colorway`, single-space
    /// separated even when a field is empty.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.brand, self.model, self.colorway)
    }
}

/// Catalog files write `null` for unknown text and tag fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Nested market record attached to each [`SneakerRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sale: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for saving a custom design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDesign {
    #[serde(default)]
    pub user_id: Option<String>,
    pub sneaker_id: String,
    pub name: String,
    /// Part name to hex color.
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Part name to material key.
    #[serde(default)]
    pub materials: HashMap<String, String>,
    #[serde(default)]
    pub laces: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for creating a price-drop or restock alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    #[serde(default)]
    pub user_id: Option<String>,
    pub sneaker_id: String,
    /// `price_drop` or `restock`. Stored as given.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
