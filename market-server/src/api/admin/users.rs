//! Admin user management handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::{AppResult, Role};

use crate::core::ServerState;
use crate::db::models::UserPublic;
use crate::db::repository::UserRepository;

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub role: Role,
}

/// GET /api/admin/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserPublic>>> {
    let users = UserRepository::new(state.db()).find_all().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// PUT /api/admin/users/:id/role
pub async fn set_role(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RolePayload>,
) -> AppResult<Json<UserPublic>> {
    let user = UserRepository::new(state.db())
        .set_role(&id, payload.role)
        .await?;
    tracing::info!(user = %id, role = %payload.role, "User role changed");
    Ok(Json(user.into()))
}

/// DELETE /api/admin/users/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = UserRepository::new(state.db()).delete(&id).await?;
    Ok(Json(deleted))
}
