//! Order model and payment/status enums

use super::driver::GeoPoint;
use super::serde_helpers::{option_record_id, record_id};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

/// Lifecycle state of an order
///
/// Drivers walk the delivery leg (`assigned` onwards) under a fixed
/// transition table; admins may set any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Assigned,
    PickedUp,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Assigned,
        Self::PickedUp,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Assigned => "assigned",
            Self::PickedUp => "picked_up",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "assigned" => Ok(Self::Assigned),
            "picked_up" => Ok(Self::PickedUp),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    OnlinePayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentMethod {
    /// Cash settles on delivery, everything else is captured up front
    pub const fn initial_payment_status(&self) -> PaymentStatus {
        match self {
            Self::Cash => PaymentStatus::Pending,
            Self::Card | Self::OnlinePayment => PaymentStatus::Paid,
        }
    }
}

/// Order line, snapshotting name and price at placement time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "record_id")]
    pub product: RecordId,
    #[serde(with = "record_id")]
    pub store: RecordId,
    #[serde(with = "record_id")]
    pub offering: RecordId,
    pub name: String,
    pub quantity: u32,
    pub price_at_order: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(with = "record_id")]
    pub customer: RecordId,
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub driver: Option<RecordId>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub delivery_fee: f64,
    pub status: OrderStatus,
    pub delivery_address: DeliveryAddress,
    /// Denormalized from the customer profile at placement
    pub customer_phone: String,
    /// Denormalized from the driver profile at assignment
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub driver_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_slot_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_slot_end: Option<String>,
    /// Stamped exactly once, on the first transition into delivered
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

/// Cart line submitted by a customer
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    /// Target `store_product` record, as "store_product:id"
    pub offering_id: String,
    pub quantity: u32,
}

/// Order placement payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<CartLine>,
    pub delivery_address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_slot_start: Option<String>,
    #[serde(default)]
    pub delivery_slot_end: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
        let status: OrderStatus = serde_json::from_str("\"picked_up\"").unwrap();
        assert_eq!(status, OrderStatus::PickedUp);
    }

    #[test]
    fn test_cash_starts_payment_pending() {
        assert_eq!(
            PaymentMethod::Cash.initial_payment_status(),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentMethod::Card.initial_payment_status(),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentMethod::OnlinePayment.initial_payment_status(),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Assigned.is_terminal());
    }
}
