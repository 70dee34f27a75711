//! User account model
//!
//! A user is the login identity. Role-specific data (customer addresses,
//! driver vehicle details) lives in a linked profile record.

use super::serde_helpers::{option_record_id, record_id};
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    pub email: String,
    /// Argon2 password hash, never sent to clients
    pub password: String,
    pub role: Role,
    /// Linked customer or driver profile record
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub profile: Option<RecordId>,
    pub is_verified: bool,
    pub created_at: String,
}

/// User view safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    #[serde(with = "record_id")]
    pub id: RecordId,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub profile: Option<RecordId>,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            // id is always present on rows read back from the database
            id: user.id.expect("user record without id"),
            email: user.email,
            role: user.role,
            profile: user.profile,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
