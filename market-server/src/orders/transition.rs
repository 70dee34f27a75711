//! Order status transitions
//!
//! Driver moves are checked against the transition table and written with
//! a guard on the expected current state, so two racing updates resolve
//! to exactly one winner. Admin writes bypass the table but still stamp
//! `delivered_at` only on the first arrival at delivered.

use shared::{AppError, AppResult, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Order, OrderStatus};
use crate::db::repository::{DriverRepository, OrderRepository, parse_record_id};
use crate::orders::status::driver_can;

pub struct OrderTransitions {
    orders: OrderRepository,
    drivers: DriverRepository,
}

impl OrderTransitions {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            drivers: DriverRepository::new(db),
        }
    }

    /// Driver-initiated status change on an order assigned to them
    pub async fn driver_update_status(
        &self,
        order_id: &str,
        driver_profile_id: &str,
        target: OrderStatus,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        let order_rid = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record has no id"))?;

        let driver_rid = parse_record_id("driver", driver_profile_id)
            .map_err(AppError::from)?;
        if order.driver.as_ref() != Some(&driver_rid) {
            return Err(AppError::not_owner("Order is not assigned to this driver"));
        }

        if !driver_can(order.status, target) {
            return Err(AppError::invalid_transition(
                order.status.as_str(),
                target.as_str(),
            ));
        }

        let stamp_delivered = target == OrderStatus::Delivered && order.delivered_at.is_none();
        let updated = self
            .orders
            .transition_checked(&order_rid, &driver_rid, order.status, target, stamp_delivered)
            .await?;

        updated.ok_or_else(|| {
            // The guard missed: another writer got there first
            AppError::conflict("Order was modified concurrently, refresh and retry")
        })
    }

    /// Admin status override and/or driver assignment.
    ///
    /// Assigning a driver denormalizes their phone onto the order and,
    /// unless a status is given, moves the order to assigned.
    pub async fn admin_update(
        &self,
        order_id: &str,
        status: Option<OrderStatus>,
        driver_id: Option<&str>,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        let order_rid = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record has no id"))?;

        let assignment = match driver_id {
            Some(driver_id) => {
                let driver = self
                    .drivers
                    .find_by_id(driver_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::DriverNotFound))?;
                let driver_rid = driver
                    .id
                    .ok_or_else(|| AppError::internal("Driver record has no id"))?;
                Some((driver_rid, driver.phone_number))
            }
            None => None,
        };

        let status = match (status, assignment.is_some()) {
            (Some(status), _) => Some(status),
            (None, true) => Some(OrderStatus::Assigned),
            (None, false) => None,
        };

        let stamp_delivered =
            status == Some(OrderStatus::Delivered) && order.delivered_at.is_none();

        let updated = self
            .orders
            .admin_update(&order_rid, status, assignment, stamp_delivered)
            .await?;
        Ok(updated)
    }
}
