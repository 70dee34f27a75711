//! Customer API module
//!
//! The aggregated catalog is public; order routes require the customer
//! role.

mod handler;

use axum::{
    Router, middleware,
    routing::get,
};

use crate::auth::require_customer;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let orders = Router::new()
        .route("/orders", get(handler::my_orders).post(handler::place_order))
        .route("/orders/{id}", get(handler::get_order))
        .route_layer(middleware::from_fn(require_customer));

    Router::new().nest(
        "/api/customers",
        Router::new()
            .route("/products", get(handler::list_products))
            .merge(orders),
    )
}
