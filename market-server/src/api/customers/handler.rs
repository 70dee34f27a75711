//! Customer API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::catalog::{CatalogView, ProductWithOfferings};
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::orders::OrderPlacement;

/// GET /api/customers/products - aggregated catalog, public
pub async fn list_products(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ProductWithOfferings>>> {
    let catalog = CatalogView::new(state.db()).products_with_offerings().await?;
    Ok(Json(catalog))
}

/// POST /api/customers/orders - place an order from a cart
pub async fn place_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let customer_id = user.profile_id()?;
    let order = OrderPlacement::new(state.db())
        .place_order(customer_id, payload, state.config.delivery_fee)
        .await?;

    // Confirmation mail is best effort
    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Order received",
            &format!("Your order for R{:.2} has been received.", order.total_amount),
        )
        .await
    {
        tracing::warn!(error = %e, "Order confirmation mail failed");
    }

    Ok(Json(order))
}

/// GET /api/customers/orders - the caller's order history
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let customer = parse_record_id("customer", user.profile_id()?)?;
    let orders = OrderRepository::new(state.db())
        .find_by_customer(&customer)
        .await?;
    Ok(Json(orders))
}

/// GET /api/customers/orders/:id
pub async fn get_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = OrderRepository::new(state.db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let customer = parse_record_id("customer", user.profile_id()?)?;
    if order.customer != customer {
        return Err(AppError::not_owner("Order belongs to another customer"));
    }
    Ok(Json(order))
}
