//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const CUSTOMER_TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, user: RecordId, data: CustomerCreate) -> RepoResult<Customer> {
        let customer = Customer {
            id: None,
            first_name: data.first_name,
            last_name: data.last_name,
            phone_number: data.phone_number,
            addresses: data.addresses,
            user,
            created_at: time::now_rfc3339(),
        };
        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let rid = parse_record_id(CUSTOMER_TABLE, id)?;
        let customer: Option<Customer> = self.base.db().select(rid).await?;
        Ok(customer)
    }

    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(customers.into_iter().next())
    }

    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let rid = parse_record_id(CUSTOMER_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.first_name.is_some() {
            set_parts.push("first_name = $first_name");
        }
        if data.last_name.is_some() {
            set_parts.push("last_name = $last_name");
        }
        if data.phone_number.is_some() {
            set_parts.push("phone_number = $phone_number");
        }
        if data.addresses.is_some() {
            set_parts.push("addresses = $addresses");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)));
        }

        let query_str = format!("UPDATE $customer SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("customer", rid));
        if let Some(v) = data.first_name {
            query = query.bind(("first_name", v));
        }
        if let Some(v) = data.last_name {
            query = query.bind(("last_name", v));
        }
        if let Some(v) = data.phone_number {
            query = query.bind(("phone_number", v));
        }
        if let Some(v) = data.addresses {
            query = query.bind(("addresses", v));
        }

        let customers: Vec<Customer> = query.await?.take(0)?;
        customers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))
    }
}
