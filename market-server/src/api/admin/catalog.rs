//! Admin catalog handlers: canonical products and store offerings

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;
use crate::db::models::product::ProductCreate;
use crate::db::models::{Product, ProductUpdate, StoreProduct, StoreProductUpdate};
use crate::db::repository::offering::OfferingSnapshot;
use crate::db::repository::{
    OfferingRepository, ProductRepository, RepoError, StoreRepository, parse_record_id,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingCreatePayload {
    pub store_id: String,
    pub product_id: String,
    pub price: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
}

fn default_true() -> bool {
    true
}

// ==================== Canonical products ====================

/// GET /api/admin/products
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.db()).find_all().await?;
    Ok(Json(products))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    match ProductRepository::new(state.db()).create(payload).await {
        Ok(product) => Ok(Json(product)),
        Err(RepoError::Duplicate(_)) => Err(AppError::conflict(
            "A product with this name and brand already exists",
        )),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/admin/products/:id
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    match ProductRepository::new(state.db()).update(&id, payload).await {
        Ok(product) => Ok(Json(product)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::ProductNotFound)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/admin/products/:id
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = ProductRepository::new(state.db()).delete(&id).await?;
    Ok(Json(deleted))
}

// ==================== Store offerings ====================

/// GET /api/admin/stores/:id/products - one store's offerings
pub async fn offerings_by_store(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StoreProduct>>> {
    let store = parse_record_id("store", &id)?;
    let offerings = OfferingRepository::new(state.db())
        .find_by_store(&store)
        .await?;
    Ok(Json(offerings))
}

/// POST /api/admin/store-products
pub async fn create_offering(
    State(state): State<ServerState>,
    Json(payload): Json<OfferingCreatePayload>,
) -> AppResult<Json<StoreProduct>> {
    if payload.price < 0.0 {
        return Err(AppError::validation("price must be non-negative"));
    }
    let store = StoreRepository::new(state.db())
        .find_by_id(&payload.store_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
    let product = ProductRepository::new(state.db())
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let store_id = store
        .id
        .ok_or_else(|| AppError::internal("Store record has no id"))?;
    let product_id = product
        .id
        .ok_or_else(|| AppError::internal("Product record has no id"))?;

    match OfferingRepository::new(state.db())
        .create(
            store_id,
            product_id,
            OfferingSnapshot {
                price: payload.price,
                is_available: payload.is_available,
                external_id: payload.external_id,
                external_url: payload.external_url,
            },
        )
        .await
    {
        Ok(offering) => Ok(Json(offering)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::OfferingExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/admin/store-products/:id
pub async fn update_offering(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StoreProductUpdate>,
) -> AppResult<Json<StoreProduct>> {
    match OfferingRepository::new(state.db()).update(&id, payload).await {
        Ok(offering) => Ok(Json(offering)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::OfferingNotFound)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/admin/store-products/:id
pub async fn delete_offering(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = OfferingRepository::new(state.db()).delete(&id).await?;
    Ok(Json(deleted))
}
