//! Admin order handlers
//!
//! The status endpoint is the trusted escape hatch: it may set any
//! status and reassign drivers, unconstrained by the driver transition
//! table.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::orders::OrderTransitions;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatusPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub driver_id: Option<String>,
}

/// GET /api/admin/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.db()).find_all().await?;
    Ok(Json(orders))
}

/// GET /api/admin/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = OrderRepository::new(state.db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

/// PUT /api/admin/orders/:id/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AdminStatusPayload>,
) -> AppResult<Json<Order>> {
    if payload.status.is_none() && payload.driver_id.is_none() {
        return Err(AppError::validation("Provide a status, a driverId, or both"));
    }

    let status = match &payload.status {
        Some(raw) => Some(raw.parse::<OrderStatus>().map_err(|_| {
            AppError::new(ErrorCode::UnknownStatus).with_detail("status", raw.clone())
        })?),
        None => None,
    };

    let order = OrderTransitions::new(state.db())
        .admin_update(&id, status, payload.driver_id.as_deref())
        .await?;
    tracing::info!(order = %id, "Admin order update applied");
    Ok(Json(order))
}
