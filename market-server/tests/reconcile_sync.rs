//! Catalog sync integration tests
//!
//! Exercises the reconciliation engine across stores: canonical products
//! are shared by (name, brand), offerings stay per store, and re-runs
//! against an unchanged feed write nothing.

use market_server::catalog::{ExternalProduct, MockFeedAdapter, ReconcileEngine};
use market_server::db;
use market_server::db::models::{Store, StoreAddress, StoreCreate};
use market_server::db::repository::{OfferingRepository, ProductRepository, StoreRepository};
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

fn feed_item(name: &str, brand: &str, price: f64, available: bool) -> ExternalProduct {
    ExternalProduct {
        external_id: Some(format!("EXT-{}", name)),
        name: name.to_string(),
        description: Some("From the partner feed".to_string()),
        price,
        unit: Some("each".to_string()),
        category: Some("Groceries".to_string()),
        image_url: None,
        brand: Some(brand.to_string()),
        available,
        external_url: None,
    }
}

async fn make_store(db: &Surreal<Db>, name: &str) -> Store {
    StoreRepository::new(db.clone())
        .create(StoreCreate {
            name: name.to_string(),
            address: StoreAddress {
                street: "1 Main Rd".to_string(),
                city: "Johannesburg".to_string(),
                postal_code: "2000".to_string(),
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
async fn test_two_stores_share_canonical_products() {
    let conn = db::connect_memory().await.unwrap();
    let store_a = make_store(&conn, "Shoprite Maponya Mall").await;
    let store_b = make_store(&conn, "Shoprite Soweto").await;
    let engine = ReconcileEngine::new(conn.clone());

    let feed_a = MockFeedAdapter::returning(vec![
        feed_item("Maize Meal 2.5kg", "White Star", 21.5, true),
        feed_item("Full Cream Milk 2L", "Clover", 35.0, true),
    ]);
    let first = engine.sync_store(&store_a, &feed_a).await.unwrap();
    assert_eq!(first.new_products_added, 2);
    assert_eq!(first.updated_offerings, 2);

    // Same items at the second store create no new canonical products
    let feed_b = MockFeedAdapter::returning(vec![
        feed_item("Maize Meal 2.5kg", "White Star", 22.0, true),
        feed_item("Full Cream Milk 2L", "Clover", 33.5, true),
    ]);
    let second = engine.sync_store(&store_b, &feed_b).await.unwrap();
    assert_eq!(second.new_products_added, 0);
    assert_eq!(second.updated_offerings, 2);

    let products = ProductRepository::new(conn.clone()).find_all().await.unwrap();
    assert_eq!(products.len(), 2);

    // Each store keeps its own price
    let offerings = OfferingRepository::new(conn.clone());
    let in_a = offerings.find_by_store(store_a.id.as_ref().unwrap()).await.unwrap();
    let in_b = offerings.find_by_store(store_b.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(in_a.len(), 2);
    assert_eq!(in_b.len(), 2);
    let maize_a = in_a.iter().find(|o| o.price == 21.5);
    let maize_b = in_b.iter().find(|o| o.price == 22.0);
    assert!(maize_a.is_some());
    assert!(maize_b.is_some());
}

#[tokio::test]
async fn test_repeat_runs_settle_to_unchanged() {
    let conn = db::connect_memory().await.unwrap();
    let store = make_store(&conn, "Shoprite Maponya Mall").await;
    let engine = ReconcileEngine::new(conn.clone());
    let adapter = MockFeedAdapter::returning(vec![
        feed_item("Maize Meal 2.5kg", "White Star", 21.5, true),
        feed_item("Full Cream Milk 2L", "Clover", 35.0, true),
    ]);

    engine.sync_store(&store, &adapter).await.unwrap();
    for _ in 0..3 {
        let summary = engine.sync_store(&store, &adapter).await.unwrap();
        assert_eq!(summary.new_products_added, 0);
        assert_eq!(summary.updated_offerings, 0);
        assert_eq!(summary.unchanged_offerings, 2);
    }
}

#[tokio::test]
async fn test_availability_flip_counts_as_update() {
    let conn = db::connect_memory().await.unwrap();
    let store = make_store(&conn, "Shoprite Maponya Mall").await;
    let engine = ReconcileEngine::new(conn.clone());

    let stocked = MockFeedAdapter::returning(vec![feed_item(
        "Maize Meal 2.5kg",
        "White Star",
        21.5,
        true,
    )]);
    engine.sync_store(&store, &stocked).await.unwrap();

    let sold_out = MockFeedAdapter::returning(vec![feed_item(
        "Maize Meal 2.5kg",
        "White Star",
        21.5,
        false,
    )]);
    let summary = engine.sync_store(&store, &sold_out).await.unwrap();
    assert_eq!(summary.updated_offerings, 1);
    assert_eq!(summary.unchanged_offerings, 0);

    let offerings = OfferingRepository::new(conn)
        .find_by_store(store.id.as_ref().unwrap())
        .await
        .unwrap();
    assert!(!offerings[0].is_available);
}

#[tokio::test]
async fn test_last_checked_moves_only_on_change() {
    let conn = db::connect_memory().await.unwrap();
    let store = make_store(&conn, "Shoprite Maponya Mall").await;
    let engine = ReconcileEngine::new(conn.clone());
    let adapter = MockFeedAdapter::returning(vec![feed_item(
        "Maize Meal 2.5kg",
        "White Star",
        21.5,
        true,
    )]);

    engine.sync_store(&store, &adapter).await.unwrap();
    let offerings = OfferingRepository::new(conn.clone());
    let before = offerings
        .find_by_store(store.id.as_ref().unwrap())
        .await
        .unwrap()[0]
        .last_checked
        .clone();

    // An identical feed leaves the timestamp alone
    engine.sync_store(&store, &adapter).await.unwrap();
    let after = offerings
        .find_by_store(store.id.as_ref().unwrap())
        .await
        .unwrap()[0]
        .last_checked
        .clone();
    assert_eq!(before, after);
}
