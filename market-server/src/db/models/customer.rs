//! Customer profile model

use super::serde_helpers::{option_record_id, record_id};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Saved delivery address on a customer profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state_province: Option<String>,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_country() -> String {
    "South Africa".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Owning user account
    #[serde(with = "record_id")]
    pub user: RecordId,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerCreate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Partial update payload, only present fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub addresses: Option<Vec<Address>>,
}
