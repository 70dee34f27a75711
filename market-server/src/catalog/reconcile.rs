//! Catalog sync engine
//!
//! Reconciles one store's feed payload into the canonical catalog:
//! products are matched by (name, brand) and created with catalog
//! defaults when new, then the store's offering row is created or
//! refreshed. A re-run against an unchanged feed writes nothing and
//! reports every offering as unchanged.

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::catalog::feed::{ExternalProduct, FeedAdapter, StoreFeedConfig};
use crate::db::models::Store;
use crate::db::models::product::{DEFAULT_BRAND, Product, ProductCreate};
use crate::db::repository::offering::OfferingSnapshot;
use crate::db::repository::{OfferingRepository, ProductRepository, RepoError};

/// Outcome of one store sync, in the shape API clients consume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub new_products_added: u32,
    /// Offerings written this run, newly created ones included
    pub updated_offerings: u32,
    pub unchanged_offerings: u32,
    /// Malformed feed items (no name, negative price) left out of the run.
    /// The four counters always sum to the feed size.
    pub skipped_items: u32,
}

pub struct ReconcileEngine {
    products: ProductRepository,
    offerings: OfferingRepository,
}

impl ReconcileEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            offerings: OfferingRepository::new(db),
        }
    }

    /// Run a full sync of one store against its feed
    pub async fn sync_store(
        &self,
        store: &Store,
        adapter: &dyn FeedAdapter,
    ) -> AppResult<SyncSummary> {
        let config = StoreFeedConfig::from_store(store)?;
        let store_id = store
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Store record has no id"))?;

        let feed = adapter.fetch(&config).await?;
        tracing::info!(store = %store.name, items = feed.len(), "Feed fetched, reconciling");

        let mut summary = SyncSummary::default();
        for item in feed {
            if item.name.trim().is_empty() {
                tracing::warn!(store = %store.name, "Skipping feed item without a name");
                summary.skipped_items += 1;
                continue;
            }
            if item.price < 0.0 || !item.price.is_finite() {
                tracing::warn!(
                    store = %store.name,
                    item = %item.name,
                    price = item.price,
                    "Skipping feed item with invalid price"
                );
                summary.skipped_items += 1;
                continue;
            }
            self.reconcile_item(&store_id, item, &mut summary).await?;
        }

        tracing::info!(
            store = %store.name,
            new_products = summary.new_products_added,
            updated = summary.updated_offerings,
            unchanged = summary.unchanged_offerings,
            skipped = summary.skipped_items,
            "Sync complete"
        );
        Ok(summary)
    }

    async fn reconcile_item(
        &self,
        store_id: &RecordId,
        item: ExternalProduct,
        summary: &mut SyncSummary,
    ) -> AppResult<()> {
        let (product, created) = self.find_or_create_product(&item).await?;
        if created {
            summary.new_products_added += 1;
        }
        let product_id = product
            .id
            .ok_or_else(|| AppError::internal("Product record has no id"))?;

        let snapshot = OfferingSnapshot {
            price: item.price,
            is_available: item.available,
            external_id: item.external_id,
            external_url: item.external_url,
        };

        // Guarded update writes only when a feed-owned field differs
        if self
            .offerings
            .update_if_changed(store_id, &product_id, snapshot.clone())
            .await
            .map_err(sync_write_error)?
            .is_some()
        {
            summary.updated_offerings += 1;
            return Ok(());
        }

        if self
            .offerings
            .exists(store_id, &product_id)
            .await
            .map_err(sync_write_error)?
        {
            summary.unchanged_offerings += 1;
            return Ok(());
        }

        match self
            .offerings
            .create(store_id.clone(), product_id.clone(), snapshot.clone())
            .await
        {
            // A brand-new offering counts as updated
            Ok(_) => summary.updated_offerings += 1,
            // Lost a create race, retry as an update
            Err(RepoError::Duplicate(_)) => {
                if self
                    .offerings
                    .update_if_changed(store_id, &product_id, snapshot)
                    .await
                    .map_err(sync_write_error)?
                    .is_some()
                {
                    summary.updated_offerings += 1;
                } else {
                    summary.unchanged_offerings += 1;
                }
            }
            Err(e) => return Err(sync_write_error(e)),
        }
        Ok(())
    }

    /// Match by (name, brand), creating with catalog defaults when absent.
    /// Returns whether a new product was created.
    async fn find_or_create_product(&self, item: &ExternalProduct) -> AppResult<(Product, bool)> {
        let brand = item
            .brand
            .clone()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BRAND.to_string());

        if let Some(existing) = self
            .products
            .find_by_name_brand(&item.name, &brand)
            .await
            .map_err(sync_write_error)?
        {
            return Ok((existing, false));
        }

        let create = ProductCreate {
            name: item.name.clone(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            category: item.category.clone(),
            image_url: item.image_url.clone(),
            brand: Some(brand.clone()),
        };

        match self.products.create(create).await {
            Ok(product) => Ok((product, true)),
            // Another sync created it first; the unique index kept one copy
            Err(RepoError::Duplicate(_)) => {
                let existing = self
                    .products
                    .find_by_name_brand(&item.name, &brand)
                    .await
                    .map_err(sync_write_error)?
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::SyncWriteFailed,
                            format!("Product '{}' vanished during sync", item.name),
                        )
                    })?;
                Ok((existing, false))
            }
            Err(e) => Err(sync_write_error(e)),
        }
    }
}

fn sync_write_error(err: RepoError) -> AppError {
    AppError::with_message(ErrorCode::SyncWriteFailed, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::feed::MockFeedAdapter;
    use crate::db;
    use crate::db::models::StoreAddress;
    use crate::db::models::product::{DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_UNIT};
    use crate::db::repository::StoreRepository;
    use crate::db::models::StoreCreate;
    use std::collections::HashMap;

    fn feed_item(name: &str, price: f64) -> ExternalProduct {
        ExternalProduct {
            external_id: Some(format!("EXT-{}", name)),
            name: name.to_string(),
            description: None,
            price,
            unit: None,
            category: None,
            image_url: None,
            brand: None,
            available: true,
            external_url: None,
        }
    }

    async fn syncable_store(db: &Surreal<Db>) -> Store {
        StoreRepository::new(db.clone())
            .create(StoreCreate {
                name: "Shoprite Test".to_string(),
                address: StoreAddress {
                    street: "1 Test St".to_string(),
                    city: "Cape Town".to_string(),
                    postal_code: "8001".to_string(),
                    coordinates: None,
                },
                contact_email: None,
                contact_phone: None,
                operating_hours: None,
                feed_format: Some("shoprite".to_string()),
                api_base_url: Some("https://feeds.example".to_string()),
                api_key: Some("key".to_string()),
                api_credentials: HashMap::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_sync_creates_products_and_offerings() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn.clone());
        let adapter =
            MockFeedAdapter::returning(vec![feed_item("Milk 1L", 21.5), feed_item("Bread", 18.0)]);

        let summary = engine.sync_store(&store, &adapter).await.unwrap();
        assert_eq!(summary.new_products_added, 2);
        assert_eq!(summary.updated_offerings, 2);
        assert_eq!(summary.unchanged_offerings, 0);
    }

    #[tokio::test]
    async fn test_repeat_sync_is_idempotent() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn.clone());
        let adapter = MockFeedAdapter::returning(vec![feed_item("Milk 1L", 21.5)]);

        engine.sync_store(&store, &adapter).await.unwrap();
        let second = engine.sync_store(&store, &adapter).await.unwrap();

        assert_eq!(second.new_products_added, 0);
        assert_eq!(second.updated_offerings, 0);
        assert_eq!(second.unchanged_offerings, 1);
    }

    #[tokio::test]
    async fn test_price_change_updates_offering_only() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn.clone());

        let first = MockFeedAdapter::returning(vec![feed_item("Milk 1L", 21.5)]);
        engine.sync_store(&store, &first).await.unwrap();

        let repriced = MockFeedAdapter::returning(vec![feed_item("Milk 1L", 23.0)]);
        let summary = engine.sync_store(&store, &repriced).await.unwrap();

        assert_eq!(summary.new_products_added, 0);
        assert_eq!(summary.updated_offerings, 1);
        assert_eq!(summary.unchanged_offerings, 0);
    }

    #[tokio::test]
    async fn test_missing_fields_get_catalog_defaults() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn.clone());
        let adapter = MockFeedAdapter::returning(vec![feed_item("Mystery Item", 5.0)]);

        engine.sync_store(&store, &adapter).await.unwrap();

        let product = ProductRepository::new(conn)
            .find_by_name_brand("Mystery Item", DEFAULT_BRAND)
            .await
            .unwrap()
            .expect("product should exist under the default brand");
        assert_eq!(product.description, DEFAULT_DESCRIPTION);
        assert_eq!(product.unit, DEFAULT_UNIT);
        assert_eq!(product.category, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn test_feed_failure_propagates() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn);
        let adapter = MockFeedAdapter::failing("connection refused");

        let err = engine.sync_store(&store, &adapter).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedFetchFailed);
    }

    #[tokio::test]
    async fn test_unconfigured_store_rejected_before_fetch() {
        let conn = db::connect_memory().await.unwrap();
        let mut store = syncable_store(&conn).await;
        store.api_base_url = None;
        store.api_key = None;

        let engine = ReconcileEngine::new(conn);
        let adapter = MockFeedAdapter::returning(vec![feed_item("Milk 1L", 21.5)]);

        let err = engine.sync_store(&store, &adapter).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreNotSyncable);
    }

    #[tokio::test]
    async fn test_nameless_items_are_skipped_and_counted() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn);
        let adapter = MockFeedAdapter::returning(vec![feed_item("", 1.0), feed_item("Eggs", 39.99)]);

        let summary = engine.sync_store(&store, &adapter).await.unwrap();
        assert_eq!(summary.new_products_added, 1);
        assert_eq!(summary.updated_offerings, 1);
        assert_eq!(summary.skipped_items, 1);
    }

    #[tokio::test]
    async fn test_negative_price_items_are_skipped_and_counted() {
        let conn = db::connect_memory().await.unwrap();
        let store = syncable_store(&conn).await;
        let engine = ReconcileEngine::new(conn.clone());
        let adapter = MockFeedAdapter::returning(vec![
            feed_item("Milk 1L", -5.0),
            feed_item("Bread", 18.0),
        ]);

        let summary = engine.sync_store(&store, &adapter).await.unwrap();
        assert_eq!(summary.new_products_added, 1);
        assert_eq!(summary.updated_offerings, 1);
        assert_eq!(summary.skipped_items, 1);

        // Nothing of the bad item reaches the catalog
        let milk = ProductRepository::new(conn)
            .find_by_name_brand("Milk 1L", DEFAULT_BRAND)
            .await
            .unwrap();
        assert!(milk.is_none());
    }
}
