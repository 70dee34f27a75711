//! Admin store management handlers
//!
//! Includes the sync trigger: POST /api/admin/stores/:id/sync-products
//! fetches the store's partner feed and reconciles it into the catalog.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::{AppError, AppResult, ErrorCode};

use crate::catalog::{ReconcileEngine, SyncSummary, adapter_for};
use crate::core::ServerState;
use crate::db::models::{Store, StoreCreate, StoreUpdate};
use crate::db::repository::{RepoError, StoreRepository};

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub summary: SyncSummary,
}

/// GET /api/admin/stores
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.db()).find_all().await?;
    Ok(Json(stores))
}

/// GET /api/admin/stores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Store>> {
    let store = StoreRepository::new(state.db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
    Ok(Json(store))
}

/// POST /api/admin/stores
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    match StoreRepository::new(state.db()).create(payload).await {
        Ok(store) => Ok(Json(store)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::StoreNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/admin/stores/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<Store>> {
    match StoreRepository::new(state.db()).update(&id, payload).await {
        Ok(store) => Ok(Json(store)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::StoreNameExists)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::StoreNotFound)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/admin/stores/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = StoreRepository::new(state.db()).delete(&id).await?;
    Ok(Json(deleted))
}

/// POST /api/admin/stores/:id/sync-products
pub async fn sync_products(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SyncResponse>> {
    let store = StoreRepository::new(state.db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;

    let format = store.feed_format.as_deref().ok_or_else(|| {
        AppError::store_not_syncable(store.name.clone())
            .with_detail("reason", "no feed format configured")
    })?;
    let adapter = adapter_for(format, state.config.feed_timeout()).ok_or_else(|| {
        AppError::store_not_syncable(store.name.clone())
            .with_detail("reason", format!("no feed adapter for '{}'", format))
    })?;

    let summary = ReconcileEngine::new(state.db())
        .sync_store(&store, adapter.as_ref())
        .await?;

    Ok(Json(SyncResponse {
        message: format!("Product sync complete for {}", store.name),
        summary,
    }))
}
