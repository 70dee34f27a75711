//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role gating.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::Role;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use shared::AppError;

/// Routes reachable without a token
const PUBLIC_API_ROUTES: [&str; 4] = [
    "/api/auth/login",
    "/api/auth/register",
    "/api/customers/products",
    "/api/health",
];

fn is_public_route(path: &str) -> bool {
    // Verification links carry their token in the path
    PUBLIC_API_ROUTES.contains(&path) || path.starts_with("/api/auth/verify-email/")
}

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into request extensions.
///
/// Skipped for OPTIONS preflight, non-`/api/` paths and the public
/// routes above.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            // Single-purpose tokens (email verification) never grant API access
            if claims.token_type != crate::auth::jwt::TOKEN_TYPE_ACCESS {
                return Err(AppError::invalid_token("Not an access token"));
            }
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn require_role(req: &Request, role: Role) -> Result<(), AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if user.role != role {
        tracing::warn!(
            user_id = %user.id,
            user_role = %user.role,
            required = %role,
            "Role check failed"
        );
        return Err(AppError::forbidden(format!("{} role required", role)));
    }
    Ok(())
}

/// Admin-only routes
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(&req, Role::Admin)?;
    Ok(next.run(req).await)
}

/// Driver-only routes
pub async fn require_driver(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(&req, Role::Driver)?;
    Ok(next.run(req).await)
}

/// Customer-only routes
pub async fn require_customer(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(&req, Role::Customer)?;
    Ok(next.run(req).await)
}
