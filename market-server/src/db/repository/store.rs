//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Store, StoreCreate, StoreUpdate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const STORE_TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store ORDER BY name")
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let rid = parse_record_id(STORE_TABLE, id)?;
        let store: Option<Store> = self.base.db().select(rid).await?;
        Ok(store)
    }

    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let store = Store {
            id: None,
            name: data.name,
            address: data.address,
            contact_email: data.contact_email,
            contact_phone: data.contact_phone,
            operating_hours: data.operating_hours,
            feed_format: data.feed_format,
            api_base_url: data.api_base_url,
            api_key: data.api_key,
            api_credentials: data.api_credentials,
            created_at: time::now_rfc3339(),
        };
        let created: Option<Store> = self.base.db().create(STORE_TABLE).content(store).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    pub async fn update(&self, id: &str, data: StoreUpdate) -> RepoResult<Store> {
        let rid = parse_record_id(STORE_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.address.is_some() {
            set_parts.push("address = $address");
        }
        if data.contact_email.is_some() {
            set_parts.push("contact_email = $contact_email");
        }
        if data.contact_phone.is_some() {
            set_parts.push("contact_phone = $contact_phone");
        }
        if data.operating_hours.is_some() {
            set_parts.push("operating_hours = $operating_hours");
        }
        if data.feed_format.is_some() {
            set_parts.push("feed_format = $feed_format");
        }
        if data.api_base_url.is_some() {
            set_parts.push("api_base_url = $api_base_url");
        }
        if data.api_key.is_some() {
            set_parts.push("api_key = $api_key");
        }
        if data.api_credentials.is_some() {
            set_parts.push("api_credentials = $api_credentials");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)));
        }

        let query_str = format!("UPDATE $store SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("store", rid));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.address {
            query = query.bind(("address", v));
        }
        if let Some(v) = data.contact_email {
            query = query.bind(("contact_email", v));
        }
        if let Some(v) = data.contact_phone {
            query = query.bind(("contact_phone", v));
        }
        if let Some(v) = data.operating_hours {
            query = query.bind(("operating_hours", v));
        }
        if let Some(v) = data.feed_format {
            query = query.bind(("feed_format", v));
        }
        if let Some(v) = data.api_base_url {
            query = query.bind(("api_base_url", v));
        }
        if let Some(v) = data.api_key {
            query = query.bind(("api_key", v));
        }
        if let Some(v) = data.api_credentials {
            query = query.bind(("api_credentials", v));
        }

        let stores: Vec<Store> = query.await?.take(0)?;
        stores
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(STORE_TABLE, id)?;
        // Drop this store's offerings so the catalog never shows orphans
        self.base
            .db()
            .query("DELETE store_product WHERE store = $store")
            .bind(("store", rid.clone()))
            .await?;
        let deleted: Option<Store> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
