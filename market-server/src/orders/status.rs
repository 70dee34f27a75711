//! Driver status transition table
//!
//! Drivers only operate the delivery leg. Everything outside this table
//! is an admin action.

use crate::db::models::OrderStatus;

/// States a driver may move an order into from `from`
pub fn driver_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Assigned => &[OrderStatus::PickedUp, OrderStatus::Cancelled],
        OrderStatus::PickedUp => &[OrderStatus::OutForDelivery],
        OrderStatus::OutForDelivery => &[OrderStatus::Delivered],
        _ => &[],
    }
}

pub fn driver_can(from: OrderStatus, to: OrderStatus) -> bool {
    driver_transitions(from).contains(&to)
}
