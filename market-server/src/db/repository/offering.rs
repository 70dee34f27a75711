//! Store offering repository (`store_product` table)
//!
//! One row per (store, product), enforced by a unique index. Feed syncs
//! go through [`OfferingRepository::update_if_changed`], a single guarded
//! UPDATE so that concurrent syncs cannot interleave a stale write.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{StoreProduct, StoreProductUpdate};
use crate::utils::time;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const OFFERING_TABLE: &str = "store_product";

/// Prices are non-negative rands; the schema assert backs this check
fn check_price(price: f64) -> RepoResult<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative amount, got {}",
            price
        )));
    }
    Ok(())
}

/// Feed-sourced snapshot of the mutable offering fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingSnapshot {
    pub price: f64,
    pub is_available: bool,
    pub external_id: Option<String>,
    pub external_url: Option<String>,
}

/// Offering with its canonical product fetched, for order placement
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedOffering {
    #[serde(with = "crate::db::models::serde_helpers::record_id")]
    pub id: RecordId,
    #[serde(with = "crate::db::models::serde_helpers::record_id")]
    pub store: RecordId,
    pub product: crate::db::models::Product,
    pub price: f64,
    pub is_available: bool,
}

#[derive(Clone)]
pub struct OfferingRepository {
    base: BaseRepository,
}

impl OfferingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<StoreProduct>> {
        let rid = parse_record_id(OFFERING_TABLE, id)?;
        let offering: Option<StoreProduct> = self.base.db().select(rid).await?;
        Ok(offering)
    }

    /// Load an offering with its product record for line-item snapshotting
    pub async fn find_resolved(&self, id: &str) -> RepoResult<Option<ResolvedOffering>> {
        let rid = parse_record_id(OFFERING_TABLE, id)?;
        let offerings: Vec<ResolvedOffering> = self
            .base
            .db()
            .query("SELECT * FROM store_product WHERE id = $id FETCH product")
            .bind(("id", rid))
            .await?
            .take(0)?;
        Ok(offerings.into_iter().next())
    }

    pub async fn find_by_store(&self, store: &RecordId) -> RepoResult<Vec<StoreProduct>> {
        let offerings: Vec<StoreProduct> = self
            .base
            .db()
            .query("SELECT * FROM store_product WHERE store = $store")
            .bind(("store", store.clone()))
            .await?
            .take(0)?;
        Ok(offerings)
    }

    pub async fn exists(&self, store: &RecordId, product: &RecordId) -> RepoResult<bool> {
        let rows: Vec<StoreProduct> = self
            .base
            .db()
            .query("SELECT * FROM store_product WHERE store = $store AND product = $product LIMIT 1")
            .bind(("store", store.clone()))
            .bind(("product", product.clone()))
            .await?
            .take(0)?;
        Ok(!rows.is_empty())
    }

    pub async fn create(
        &self,
        store: RecordId,
        product: RecordId,
        snapshot: OfferingSnapshot,
    ) -> RepoResult<StoreProduct> {
        check_price(snapshot.price)?;
        let offering = StoreProduct {
            id: None,
            store,
            product,
            price: snapshot.price,
            is_available: snapshot.is_available,
            external_id: snapshot.external_id,
            external_url: snapshot.external_url,
            last_checked: time::now_rfc3339(),
        };
        let created: Option<StoreProduct> = self
            .base
            .db()
            .create(OFFERING_TABLE)
            .content(offering)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create offering".to_string()))
    }

    /// Overwrite the feed-owned fields only when at least one differs.
    ///
    /// Compare and write happen in one statement, so `last_checked` moves
    /// exactly when a field changed. Returns the updated row, or None when
    /// the offering already matched the snapshot (or does not exist).
    pub async fn update_if_changed(
        &self,
        store: &RecordId,
        product: &RecordId,
        snapshot: OfferingSnapshot,
    ) -> RepoResult<Option<StoreProduct>> {
        check_price(snapshot.price)?;
        let updated: Vec<StoreProduct> = self
            .base
            .db()
            .query(
                "UPDATE store_product SET \
                     price = $price, \
                     is_available = $is_available, \
                     external_id = $external_id, \
                     external_url = $external_url, \
                     last_checked = $now \
                 WHERE store = $store AND product = $product AND ( \
                     price != $price OR \
                     is_available != $is_available OR \
                     external_id != $external_id OR \
                     external_url != $external_url \
                 ) RETURN AFTER",
            )
            .bind(("store", store.clone()))
            .bind(("product", product.clone()))
            .bind(("price", snapshot.price))
            .bind(("is_available", snapshot.is_available))
            .bind(("external_id", snapshot.external_id))
            .bind(("external_url", snapshot.external_url))
            .bind(("now", time::now_rfc3339()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Manual admin edit, also refreshes `last_checked`
    pub async fn update(&self, id: &str, data: StoreProductUpdate) -> RepoResult<StoreProduct> {
        if let Some(price) = data.price {
            check_price(price)?;
        }
        let rid = parse_record_id(OFFERING_TABLE, id)?;

        let mut set_parts: Vec<&str> = vec!["last_checked = $now"];
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
        }
        if data.external_id.is_some() {
            set_parts.push("external_id = $external_id");
        }
        if data.external_url.is_some() {
            set_parts.push("external_url = $external_url");
        }

        let query_str = format!("UPDATE $offering SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("offering", rid))
            .bind(("now", time::now_rfc3339()));
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }
        if let Some(v) = data.external_id {
            query = query.bind(("external_id", v));
        }
        if let Some(v) = data.external_url {
            query = query.bind(("external_url", v));
        }

        let offerings: Vec<StoreProduct> = query.await?.take(0)?;
        offerings
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Offering {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(OFFERING_TABLE, id)?;
        let deleted: Option<StoreProduct> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn snapshot(price: f64) -> OfferingSnapshot {
        OfferingSnapshot {
            price,
            is_available: true,
            external_id: None,
            external_url: None,
        }
    }

    fn ids() -> (RecordId, RecordId) {
        (
            RecordId::from_table_key("store", "s1"),
            RecordId::from_table_key("product", "p1"),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let conn = db::connect_memory().await.unwrap();
        let repo = OfferingRepository::new(conn);
        let (store, product) = ids();

        let err = repo.create(store, product, snapshot(-5.0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_if_changed_rejects_negative_price() {
        let conn = db::connect_memory().await.unwrap();
        let repo = OfferingRepository::new(conn);
        let (store, product) = ids();
        repo.create(store.clone(), product.clone(), snapshot(21.5))
            .await
            .unwrap();

        let err = repo
            .update_if_changed(&store, &product, snapshot(-0.01))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // The stored row is untouched
        let rows = repo.find_by_store(&store).await.unwrap();
        assert_eq!(rows[0].price, 21.5);
    }

    #[tokio::test]
    async fn test_admin_update_rejects_negative_price() {
        let conn = db::connect_memory().await.unwrap();
        let repo = OfferingRepository::new(conn);
        let (store, product) = ids();
        let created = repo.create(store, product, snapshot(21.5)).await.unwrap();
        let id = created.id.unwrap().to_string();

        let err = repo
            .update(
                &id,
                crate::db::models::StoreProductUpdate {
                    price: Some(-1.0),
                    is_available: None,
                    external_id: None,
                    external_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_second_offering_for_same_pair_is_duplicate() {
        let conn = db::connect_memory().await.unwrap();
        let repo = OfferingRepository::new(conn);
        let (store, product) = ids();

        repo.create(store.clone(), product.clone(), snapshot(21.5))
            .await
            .unwrap();
        let err = repo
            .create(store.clone(), product.clone(), snapshot(23.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let rows = repo.find_by_store(&store).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
