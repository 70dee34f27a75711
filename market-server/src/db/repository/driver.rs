//! Driver Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Driver, DriverCreate, DriverUpdate, GeoPoint};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const DRIVER_TABLE: &str = "driver";

#[derive(Clone)]
pub struct DriverRepository {
    base: BaseRepository,
}

impl DriverRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, user: RecordId, data: DriverCreate) -> RepoResult<Driver> {
        let driver = Driver {
            id: None,
            first_name: data.first_name,
            last_name: data.last_name,
            phone_number: data.phone_number,
            license_number: data.license_number,
            vehicle_details: data.vehicle_details,
            is_available: false,
            current_location: None,
            user,
            created_at: time::now_rfc3339(),
        };
        let created: Option<Driver> = self.base.db().create(DRIVER_TABLE).content(driver).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create driver".to_string()))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Driver>> {
        let drivers: Vec<Driver> = self
            .base
            .db()
            .query("SELECT * FROM driver ORDER BY last_name, first_name")
            .await?
            .take(0)?;
        Ok(drivers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Driver>> {
        let rid = parse_record_id(DRIVER_TABLE, id)?;
        let driver: Option<Driver> = self.base.db().select(rid).await?;
        Ok(driver)
    }

    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Driver>> {
        let drivers: Vec<Driver> = self
            .base
            .db()
            .query("SELECT * FROM driver WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(drivers.into_iter().next())
    }

    pub async fn set_availability(&self, id: &str, available: bool) -> RepoResult<Driver> {
        let rid = parse_record_id(DRIVER_TABLE, id)?;
        let drivers: Vec<Driver> = self
            .base
            .db()
            .query("UPDATE $driver SET is_available = $available RETURN AFTER")
            .bind(("driver", rid))
            .bind(("available", available))
            .await?
            .take(0)?;
        drivers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Driver {} not found", id)))
    }

    pub async fn set_location(&self, id: &str, location: GeoPoint) -> RepoResult<Driver> {
        let rid = parse_record_id(DRIVER_TABLE, id)?;
        let drivers: Vec<Driver> = self
            .base
            .db()
            .query("UPDATE $driver SET current_location = $location RETURN AFTER")
            .bind(("driver", rid))
            .bind(("location", location))
            .await?
            .take(0)?;
        drivers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Driver {} not found", id)))
    }

    pub async fn update(&self, id: &str, data: DriverUpdate) -> RepoResult<Driver> {
        let rid = parse_record_id(DRIVER_TABLE, id)?;

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
        if data.vehicle_details.is_some() {
            set_parts.push("vehicle_details = $vehicle_details");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Driver {} not found", id)));
        }

        let query_str = format!("UPDATE $driver SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("driver", rid));
        if let Some(v) = data.first_name {
            query = query.bind(("first_name", v));
        }
        if let Some(v) = data.last_name {
            query = query.bind(("last_name", v));
        }
        if let Some(v) = data.phone_number {
            query = query.bind(("phone_number", v));
        }
        if let Some(v) = data.vehicle_details {
            query = query.bind(("vehicle_details", v));
        }

        let drivers: Vec<Driver> = query.await?.take(0)?;
        drivers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Driver {} not found", id)))
    }
}
