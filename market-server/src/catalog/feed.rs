//! Partner feed adapters
//!
//! Each partner chain exposes its catalog in its own wire shape. An
//! adapter owns the HTTP conversation with one partner and maps its
//! payload into [`ExternalProduct`], the one shape the sync engine
//! understands. Feed calls are bounded by a request timeout so a dead
//! partner endpoint fails the sync instead of hanging it.

use async_trait::async_trait;
use serde::Deserialize;
use shared::{AppError, AppResult};
use std::collections::HashMap;
use std::time::Duration;

use crate::db::models::Store;

/// Partner-neutral feed item
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalProduct {
    pub external_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub available: bool,
    pub external_url: Option<String>,
}

/// Connection info for one store's feed, validated up front
#[derive(Debug, Clone)]
pub struct StoreFeedConfig {
    pub store_name: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub credentials: HashMap<String, String>,
}

impl StoreFeedConfig {
    /// Fails with a store-configuration error when the store cannot sync
    pub fn from_store(store: &Store) -> AppResult<Self> {
        if !store.is_syncable() {
            return Err(AppError::store_not_syncable(store.name.clone()));
        }
        let base_url = store
            .api_base_url
            .clone()
            .ok_or_else(|| AppError::store_not_syncable(store.name.clone()))?;
        Ok(Self {
            store_name: store.name.clone(),
            base_url,
            api_key: store.api_key.clone(),
            credentials: store.api_credentials.clone(),
        })
    }

    fn require_api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .or_else(|| self.credentials.get("api_key").map(String::as_str))
            .ok_or_else(|| AppError::store_not_syncable(self.store_name.clone()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// One partner chain's feed protocol
#[async_trait]
pub trait FeedAdapter: Send + Sync {
    /// Partner identifier, matches `Store::feed_format`
    fn partner(&self) -> &'static str;

    async fn fetch(&self, config: &StoreFeedConfig) -> AppResult<Vec<ExternalProduct>>;
}

/// Look up the adapter for a store's feed format
pub fn adapter_for(format: &str, timeout: Duration) -> Option<Box<dyn FeedAdapter>> {
    match format {
        "shoprite" => Some(Box::new(ShopriteAdapter::new(timeout))),
        "picknpay" => Some(Box::new(PickNPayAdapter::new(timeout))),
        "boxer" => Some(Box::new(BoxerAdapter::new(timeout))),
        _ => None,
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

async fn read_body(
    response: reqwest::Response,
    store_name: &str,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::feed_fetch(
            store_name,
            format!("feed endpoint returned HTTP {}", status),
        ));
    }
    Ok(response)
}

// ==================== Shoprite ====================

/// Shoprite group feed: `GET /products`, key in the `X-Api-Key` header,
/// prices in cents
pub struct ShopriteAdapter {
    client: reqwest::Client,
}

impl ShopriteAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShopriteFeed {
    items: Vec<ShopriteItem>,
}

#[derive(Debug, Deserialize)]
struct ShopriteItem {
    sku: String,
    title: String,
    #[serde(default)]
    summary: Option<String>,
    price_cents: i64,
    #[serde(default)]
    pack_size: Option<String>,
    #[serde(default)]
    aisle: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    brand_name: Option<String>,
    in_stock: bool,
    #[serde(default)]
    product_page: Option<String>,
}

impl From<ShopriteItem> for ExternalProduct {
    fn from(item: ShopriteItem) -> Self {
        Self {
            external_id: Some(item.sku),
            name: item.title,
            description: item.summary,
            price: item.price_cents as f64 / 100.0,
            unit: item.pack_size,
            category: item.aisle,
            image_url: item.image,
            brand: item.brand_name,
            available: item.in_stock,
            external_url: item.product_page,
        }
    }
}

#[async_trait]
impl FeedAdapter for ShopriteAdapter {
    fn partner(&self) -> &'static str {
        "shoprite"
    }

    async fn fetch(&self, config: &StoreFeedConfig) -> AppResult<Vec<ExternalProduct>> {
        let key = config.require_api_key()?;
        let response = self
            .client
            .get(config.endpoint("products"))
            .header("X-Api-Key", key)
            .send()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        let feed: ShopriteFeed = read_body(response, &config.store_name)
            .await?
            .json()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        Ok(feed.items.into_iter().map(Into::into).collect())
    }
}

// ==================== Pick n Pay ====================

/// Pick n Pay feed: `GET /v1/catalogue/items?api_key=...`, payload nested
/// under `data.products`
pub struct PickNPayAdapter {
    client: reqwest::Client,
}

impl PickNPayAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PickNPayFeed {
    data: PickNPayData,
}

#[derive(Debug, Deserialize)]
struct PickNPayData {
    products: Vec<PickNPayItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickNPayItem {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    current_price: f64,
    #[serde(default)]
    unit_of_measure: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    available: bool,
    #[serde(default)]
    url: Option<String>,
}

impl From<PickNPayItem> for ExternalProduct {
    fn from(item: PickNPayItem) -> Self {
        Self {
            external_id: Some(item.id),
            name: item.name,
            description: item.description,
            price: item.current_price,
            unit: item.unit_of_measure,
            category: item.category,
            image_url: item.image_url,
            brand: item.brand,
            available: item.available,
            external_url: item.url,
        }
    }
}

#[async_trait]
impl FeedAdapter for PickNPayAdapter {
    fn partner(&self) -> &'static str {
        "picknpay"
    }

    async fn fetch(&self, config: &StoreFeedConfig) -> AppResult<Vec<ExternalProduct>> {
        let key = config.require_api_key()?;
        let response = self
            .client
            .get(config.endpoint("v1/catalogue/items"))
            .query(&[("api_key", key)])
            .send()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        let feed: PickNPayFeed = read_body(response, &config.store_name)
            .await?
            .json()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        Ok(feed.data.products.into_iter().map(Into::into).collect())
    }
}

// ==================== Boxer ====================

/// Boxer feed: `GET /feed/products.json` with a bearer token, payload is
/// a bare array
pub struct BoxerAdapter {
    client: reqwest::Client,
}

impl BoxerAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BoxerItem {
    #[serde(default)]
    product_code: Option<String>,
    product_name: String,
    price: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image_link: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    is_in_stock: bool,
    #[serde(default)]
    link: Option<String>,
}

impl From<BoxerItem> for ExternalProduct {
    fn from(item: BoxerItem) -> Self {
        Self {
            external_id: item.product_code,
            name: item.product_name,
            description: None,
            price: item.price,
            unit: item.unit,
            category: item.category,
            image_url: item.image_link,
            brand: item.brand,
            available: item.is_in_stock,
            external_url: item.link,
        }
    }
}

#[async_trait]
impl FeedAdapter for BoxerAdapter {
    fn partner(&self) -> &'static str {
        "boxer"
    }

    async fn fetch(&self, config: &StoreFeedConfig) -> AppResult<Vec<ExternalProduct>> {
        let key = config.require_api_key()?;
        let response = self
            .client
            .get(config.endpoint("feed/products.json"))
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        let items: Vec<BoxerItem> = read_body(response, &config.store_name)
            .await?
            .json()
            .await
            .map_err(|e| AppError::feed_fetch(&config.store_name, e))?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}

// ==================== Mock ====================

/// Scripted adapter for tests: returns a fixed payload or a fixed error
pub struct MockFeedAdapter {
    products: Vec<ExternalProduct>,
    fail_with: Option<String>,
}

impl MockFeedAdapter {
    pub fn returning(products: Vec<ExternalProduct>) -> Self {
        Self {
            products,
            fail_with: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl FeedAdapter for MockFeedAdapter {
    fn partner(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, config: &StoreFeedConfig) -> AppResult<Vec<ExternalProduct>> {
        if let Some(message) = &self.fail_with {
            return Err(AppError::feed_fetch(&config.store_name, message));
        }
        Ok(self.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_registry_knows_partners() {
        let timeout = Duration::from_secs(5);
        for format in ["shoprite", "picknpay", "boxer"] {
            let adapter = adapter_for(format, timeout).unwrap();
            assert_eq!(adapter.partner(), format);
        }
        assert!(adapter_for("spar", timeout).is_none());
    }

    #[test]
    fn test_shoprite_prices_are_cents() {
        let item = ShopriteItem {
            sku: "SR-1".to_string(),
            title: "Milk".to_string(),
            summary: None,
            price_cents: 2150,
            pack_size: None,
            aisle: None,
            image: None,
            brand_name: None,
            in_stock: true,
            product_page: None,
        };
        let product = ExternalProduct::from(item);
        assert_eq!(product.price, 21.5);
        assert_eq!(product.external_id.as_deref(), Some("SR-1"));
    }

    #[test]
    fn test_picknpay_payload_shape() {
        let json = r#"{
            "data": { "products": [
                { "id": "PNP-9", "name": "Bread", "currentPrice": 18.99, "available": false }
            ]}
        }"#;
        let feed: PickNPayFeed = serde_json::from_str(json).unwrap();
        let product = ExternalProduct::from(feed.data.products.into_iter().next().unwrap());
        assert_eq!(product.name, "Bread");
        assert_eq!(product.price, 18.99);
        assert!(!product.available);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = StoreFeedConfig {
            store_name: "s".to_string(),
            base_url: "https://feeds.example/".to_string(),
            api_key: Some("k".to_string()),
            credentials: HashMap::new(),
        };
        assert_eq!(config.endpoint("products"), "https://feeds.example/products");
    }
}
