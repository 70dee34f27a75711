//! Admin API module

mod catalog;
mod orders;
mod stores;
mod users;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/admin",
        Router::new()
            // Users
            .route("/users", get(users::list))
            .route("/users/{id}/role", put(users::set_role))
            .route("/users/{id}", axum::routing::delete(users::delete))
            // Stores
            .route("/stores", get(stores::list).post(stores::create))
            .route(
                "/stores/{id}",
                get(stores::get_by_id)
                    .put(stores::update)
                    .delete(stores::delete),
            )
            .route("/stores/{id}/sync-products", post(stores::sync_products))
            .route("/stores/{id}/products", get(catalog::offerings_by_store))
            // Canonical products
            .route("/products", get(catalog::list_products).post(catalog::create_product))
            .route(
                "/products/{id}",
                put(catalog::update_product).delete(catalog::delete_product),
            )
            // Offerings
            .route("/store-products", post(catalog::create_offering))
            .route(
                "/store-products/{id}",
                put(catalog::update_offering).delete(catalog::delete_offering),
            )
            // Orders
            .route("/orders", get(orders::list))
            .route("/orders/{id}", get(orders::get_by_id))
            .route("/orders/{id}/status", put(orders::update_status))
            .route_layer(middleware::from_fn(require_admin)),
    )
}
