//! Aggregated catalog view
//!
//! The customer-facing catalog groups each canonical product with every
//! store's offering of it, so price comparison happens in one read.

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::serde_helpers::record_id;

/// One store's price and availability inside the aggregated view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingView {
    #[serde(with = "record_id")]
    pub id: RecordId,
    #[serde(with = "record_id")]
    pub store: RecordId,
    pub store_name: String,
    pub price: f64,
    pub is_available: bool,
    pub last_checked: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithOfferings {
    #[serde(with = "record_id")]
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub category: String,
    pub image_url: String,
    pub brand: String,
    pub offerings: Vec<OfferingView>,
}

pub struct CatalogView {
    db: Surreal<Db>,
}

impl CatalogView {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// All products with their per-store offerings, ordered by name.
    /// Products nobody currently stocks come back with an empty list.
    pub async fn products_with_offerings(&self) -> AppResult<Vec<ProductWithOfferings>> {
        let products: Vec<ProductWithOfferings> = self
            .db
            .query(
                "SELECT id, name, description, unit, category, image_url, brand, \
                     (SELECT id, store, store.name AS store_name, price, is_available, last_checked \
                      FROM store_product WHERE product = $parent.id) AS offerings \
                 FROM product ORDER BY name",
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .take(0)
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(products)
    }
}
