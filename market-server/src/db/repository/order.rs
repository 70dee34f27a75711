//! Order Repository
//!
//! Status writes are guarded: driver transitions only land when the row
//! still holds the expected status and driver, so two racing updates
//! cannot both succeed.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderStatus};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY order_date DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE customer = $customer ORDER BY order_date DESC")
            .bind(("customer", customer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_driver(&self, driver: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE driver = $driver ORDER BY order_date DESC")
            .bind(("driver", driver.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Guarded driver transition.
    ///
    /// Writes the new status only while the row still holds `expected` and
    /// is still assigned to `driver`. `delivered_at` is set in the same
    /// statement when this is the first arrival at delivered. Returns None
    /// when the guard missed, meaning the order changed under the caller.
    pub async fn transition_checked(
        &self,
        order: &RecordId,
        driver: &RecordId,
        expected: OrderStatus,
        target: OrderStatus,
        stamp_delivered: bool,
    ) -> RepoResult<Option<Order>> {
        let query_str = if stamp_delivered {
            "UPDATE $order SET status = $target, delivered_at = $now \
             WHERE status = $expected AND driver = $driver RETURN AFTER"
        } else {
            "UPDATE $order SET status = $target \
             WHERE status = $expected AND driver = $driver RETURN AFTER"
        };
        let orders: Vec<Order> = self
            .base
            .db()
            .query(query_str)
            .bind(("order", order.clone()))
            .bind(("driver", driver.clone()))
            .bind(("expected", expected))
            .bind(("target", target))
            .bind(("now", time::now_rfc3339()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Admin status/assignment write, not constrained by the driver table
    pub async fn admin_update(
        &self,
        order: &RecordId,
        status: Option<OrderStatus>,
        assignment: Option<(RecordId, String)>,
        stamp_delivered: bool,
    ) -> RepoResult<Order> {
        let mut set_parts: Vec<&str> = Vec::new();
        if status.is_some() {
            set_parts.push("status = $status");
        }
        if assignment.is_some() {
            set_parts.push("driver = $driver");
            set_parts.push("driver_phone = $driver_phone");
        }
        if stamp_delivered {
            set_parts.push("delivered_at = $now");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(&order.to_string())
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order)));
        }

        let query_str = format!("UPDATE $order SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("order", order.clone()));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        if let Some((driver, phone)) = assignment {
            query = query.bind(("driver", driver)).bind(("driver_phone", phone));
        }
        if stamp_delivered {
            query = query.bind(("now", time::now_rfc3339()));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order)))
    }
}
