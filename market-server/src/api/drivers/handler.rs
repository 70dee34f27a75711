//! Driver API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Driver, GeoPoint, Order, OrderStatus};
use crate::db::repository::{DriverRepository, OrderRepository, parse_record_id};
use crate::orders::OrderTransitions;

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    pub is_available: bool,
}

/// GET /api/drivers/orders - orders assigned to the caller
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let driver = parse_record_id("driver", user.profile_id()?)?;
    let orders = OrderRepository::new(state.db())
        .find_by_driver(&driver)
        .await?;
    Ok(Json(orders))
}

/// PUT /api/drivers/orders/:id/status
pub async fn update_order_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Order>> {
    let target: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| {
            AppError::new(ErrorCode::UnknownStatus).with_detail("status", payload.status.clone())
        })?;

    let order = OrderTransitions::new(state.db())
        .driver_update_status(&id, user.profile_id()?, target)
        .await?;
    Ok(Json(order))
}

/// PUT /api/drivers/location
pub async fn update_location(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LocationPayload>,
) -> AppResult<Json<Driver>> {
    let [longitude, latitude] = payload.coordinates;
    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::new(ErrorCode::InvalidCoordinates));
    }

    let driver = DriverRepository::new(state.db())
        .set_location(user.profile_id()?, GeoPoint::new(longitude, latitude))
        .await?;
    Ok(Json(driver))
}

/// PUT /api/drivers/availability
pub async fn update_availability(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AvailabilityPayload>,
) -> AppResult<Json<Driver>> {
    let driver = DriverRepository::new(state.db())
        .set_availability(user.profile_id()?, payload.is_available)
        .await?;
    Ok(Json(driver))
}
