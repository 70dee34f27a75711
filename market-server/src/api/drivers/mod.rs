//! Driver API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_driver;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/drivers",
        Router::new()
            .route("/orders", get(handler::my_orders))
            .route("/orders/{id}/status", put(handler::update_order_status))
            .route("/location", put(handler::update_location))
            .route("/availability", put(handler::update_availability))
            .route_layer(middleware::from_fn(require_driver)),
    )
}
