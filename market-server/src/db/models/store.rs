//! Partner store model
//!
//! A store is syncable when it carries enough feed connection info for
//! its adapter: a base URL plus an API key or credential map.

use super::driver::GeoPoint;
use super::serde_helpers::option_record_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub address: StoreAddress,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operating_hours: Option<String>,
    /// Which feed adapter talks to this store ("shoprite", "picknpay", "boxer")
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feed_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_credentials: HashMap<String, String>,
    pub created_at: String,
}

impl Store {
    /// Whether the store has enough connection info to run a product sync
    pub fn is_syncable(&self) -> bool {
        self.api_base_url.is_some()
            && (self.api_key.is_some() || !self.api_credentials.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub address: StoreAddress,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub feed_format: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_credentials: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<StoreAddress>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operating_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feed_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_credentials: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_store() -> Store {
        Store {
            id: None,
            name: "Boxer Soweto".to_string(),
            address: StoreAddress {
                street: "1 Main Rd".to_string(),
                city: "Soweto".to_string(),
                postal_code: "1804".to_string(),
                coordinates: None,
            },
            contact_email: None,
            contact_phone: None,
            operating_hours: None,
            feed_format: Some("boxer".to_string()),
            api_base_url: None,
            api_key: None,
            api_credentials: HashMap::new(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_syncable_requires_url_and_credentials() {
        let mut store = base_store();
        assert!(!store.is_syncable());

        store.api_base_url = Some("https://feeds.boxer.example".to_string());
        assert!(!store.is_syncable());

        store.api_key = Some("secret".to_string());
        assert!(store.is_syncable());
    }

    #[test]
    fn test_credential_map_alone_satisfies_syncable() {
        let mut store = base_store();
        store.api_base_url = Some("https://feeds.boxer.example".to_string());
        store
            .api_credentials
            .insert("client_id".to_string(), "abc".to_string());
        assert!(store.is_syncable());
    }
}
