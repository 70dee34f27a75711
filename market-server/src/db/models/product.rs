//! Canonical product and per-store offering models
//!
//! A product is identified by its (name, brand) pair and carries the
//! store-independent description. Each store that stocks it gets one
//! `store_product` row with that store's price and availability.

use super::serde_helpers::{option_record_id, record_id};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub const DEFAULT_DESCRIPTION: &str = "No description provided.";
pub const DEFAULT_UNIT: &str = "unit";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_BRAND: &str = "Generic";
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/150";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    /// Unit of sale ("kg", "each", "500g", ...)
    pub unit: String,
    pub category: String,
    pub image_url: String,
    pub brand: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
}

/// One store's offering of a canonical product
///
/// Unique per (store, product). Feed syncs keep price, availability and
/// external identifiers current; `last_checked` moves only on real change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProduct {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(with = "record_id")]
    pub store: RecordId,
    #[serde(with = "record_id")]
    pub product: RecordId,
    pub price: f64,
    pub is_available: bool,
    /// Product id in the partner's own system
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_url: Option<String>,
    pub last_checked: String,
}

/// Manual offering edit by an admin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_url: Option<String>,
}
