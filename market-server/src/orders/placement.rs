//! Order placement
//!
//! Turns a customer's cart into a priced order. Every line snapshots the
//! product name and offering price at placement, so later catalog syncs
//! never rewrite order history.

use shared::{AppError, AppResult, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Order, OrderCreate, OrderItem, OrderStatus};
use crate::db::repository::{CustomerRepository, OfferingRepository, OrderRepository};
use crate::utils::time;

pub struct OrderPlacement {
    customers: CustomerRepository,
    offerings: OfferingRepository,
    orders: OrderRepository,
}

impl OrderPlacement {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            customers: CustomerRepository::new(db.clone()),
            offerings: OfferingRepository::new(db.clone()),
            orders: OrderRepository::new(db),
        }
    }

    /// Validate, price and persist a new order for `customer_id`
    pub async fn place_order(
        &self,
        customer_id: &str,
        data: OrderCreate,
        delivery_fee: f64,
    ) -> AppResult<Order> {
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }

        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
        let customer_rid = customer
            .id
            .ok_or_else(|| AppError::internal("Customer record has no id"))?;

        let mut items: Vec<OrderItem> = Vec::with_capacity(data.items.len());
        let mut subtotal = 0.0;
        for line in &data.items {
            if line.quantity == 0 {
                return Err(
                    AppError::validation("Item quantity must be at least 1")
                        .with_detail("offering", line.offering_id.clone()),
                );
            }

            let offering = self
                .offerings
                .find_resolved(&line.offering_id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::OfferingNotFound)
                        .with_detail("offering", line.offering_id.clone())
                })?;

            if !offering.is_available {
                return Err(AppError::with_message(
                    ErrorCode::ItemUnavailable,
                    format!("'{}' is currently unavailable", offering.product.name),
                )
                .with_detail("offering", line.offering_id.clone()));
            }

            let product_rid = offering
                .product
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Product record has no id"))?;

            subtotal += offering.price * line.quantity as f64;
            items.push(OrderItem {
                product: product_rid,
                store: offering.store,
                offering: offering.id,
                name: offering.product.name,
                quantity: line.quantity,
                price_at_order: offering.price,
            });
        }

        let order = Order {
            id: None,
            customer: customer_rid,
            driver: None,
            items,
            total_amount: subtotal + delivery_fee,
            delivery_fee,
            status: OrderStatus::Pending,
            delivery_address: data.delivery_address,
            customer_phone: customer.phone_number.unwrap_or_default(),
            driver_phone: None,
            payment_method: data.payment_method,
            payment_status: data.payment_method.initial_payment_status(),
            order_date: time::now_rfc3339(),
            delivery_slot_start: data.delivery_slot_start,
            delivery_slot_end: data.delivery_slot_end,
            delivered_at: None,
            notes: data.notes,
        };

        let created = self.orders.create(order).await?;
        tracing::info!(
            order = %created.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            total = created.total_amount,
            "Order placed"
        );
        Ok(created)
    }
}
