//! Auth API handlers
//!
//! Registration creates the user account plus the role profile in one
//! request, then returns a token so clients go straight to an
//! authenticated session.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ErrorCode, Role};
use validator::Validate;

use crate::auth::{CurrentUser, JwtError, password};
use crate::core::ServerState;
use crate::db::models::{
    Address, Customer, CustomerCreate, CustomerUpdate, Driver, DriverCreate, DriverUpdate,
    UserPublic,
};
use crate::db::repository::{CustomerRepository, DriverRepository, RepoError, UserRepository};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, message = "is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Driver-only fields
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub vehicle_details: Option<String>,
    /// Customer-only field
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserPublic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatePayload {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<Address>>,
    #[serde(default)]
    pub vehicle_details: Option<String>,
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::validation(errors.to_string().replace('\n', "; "))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate().map_err(validation_error)?;

    // Admin accounts are provisioned, never self-registered
    if payload.role.is_admin() {
        return Err(AppError::forbidden("Cannot self-register as admin"));
    }
    if payload.role.is_driver() {
        if payload.license_number.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::validation("licenseNumber is required for drivers"));
        }
        if payload.phone_number.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::validation("phoneNumber is required for drivers"));
        }
    }

    let users = UserRepository::new(state.db());
    let hash = password::hash_password(&payload.password)?;
    let user = match users
        .create(payload.email.clone(), hash, payload.role)
        .await
    {
        Ok(user) => user,
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
        }
        Err(e) => return Err(e.into()),
    };
    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let profile_id = match payload.role {
        Role::Customer => CustomerRepository::new(state.db())
            .create(
                user_id.clone(),
                CustomerCreate {
                    first_name: payload.first_name,
                    last_name: payload.last_name,
                    phone_number: payload.phone_number,
                    addresses: payload.addresses,
                },
            )
            .await?
            .id,
        Role::Driver => {
            DriverRepository::new(state.db())
                .create(
                    user_id.clone(),
                    DriverCreate {
                        first_name: payload.first_name,
                        last_name: payload.last_name,
                        phone_number: payload.phone_number.unwrap_or_default(),
                        license_number: payload.license_number.unwrap_or_default(),
                        vehicle_details: payload.vehicle_details,
                    },
                )
                .await?
                .id
        }
        Role::Admin => unreachable!("admin registration rejected above"),
    };

    let user = match profile_id.clone() {
        Some(profile) => users.link_profile(&user_id, profile).await?,
        None => user,
    };

    // Verification mail is best effort
    match state.jwt_service.generate_verification_token(
        &user_id.to_string(),
        &payload.email,
        payload.role,
    ) {
        Ok(verification) => {
            let body = format!(
                "Your account has been created. Verify your email address by \
                 visiting /api/auth/verify-email/{}",
                verification
            );
            if let Err(e) = state
                .mailer
                .send(&payload.email, "Welcome to the marketplace", &body)
                .await
            {
                tracing::warn!(error = %e, "Verification mail failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not issue verification token"),
    }

    let token = state
        .jwt_service
        .generate_token(
            &user_id.to_string(),
            &payload.email,
            payload.role,
            profile_id.map(|p| p.to_string()),
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(email = %payload.email, role = %payload.role, "User registered");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate().map_err(validation_error)?;

    let users = UserRepository::new(state.db());
    let user = users
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !password::verify_password(&payload.password, &user.password) {
        tracing::warn!(email = %payload.email, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record has no id"))?;
    let token = state
        .jwt_service
        .generate_token(
            &user_id.to_string(),
            &user.email,
            user.role,
            user.profile.as_ref().map(ToString::to_string),
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ProfileResponse>> {
    let account = UserRepository::new(state.db())
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let user_id = account
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let (customer, driver) = match user.role {
        Role::Customer => (
            CustomerRepository::new(state.db())
                .find_by_user(&user_id)
                .await?,
            None,
        ),
        Role::Driver => (
            None,
            DriverRepository::new(state.db())
                .find_by_user(&user_id)
                .await?,
        ),
        Role::Admin => (None, None),
    };

    Ok(Json(ProfileResponse {
        user: account.into(),
        customer,
        driver,
    }))
}

/// GET /api/auth/verify-email/:token
///
/// Public route; the mailed token is the only credential.
pub async fn verify_email(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<UserPublic>> {
    let claims = state
        .jwt_service
        .validate_verification_token(&token)
        .map_err(|e| match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid verification link"),
        })?;

    let user = UserRepository::new(state.db())
        .set_verified(&claims.sub, true)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::UserNotFound),
            e => e.into(),
        })?;

    tracing::info!(user = %claims.sub, "Email address verified");
    Ok(Json(user.into()))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdatePayload>,
) -> AppResult<Json<ProfileResponse>> {
    let profile_id = user.profile_id()?.to_string();

    let (customer, driver) = match user.role {
        Role::Customer => {
            let updated = CustomerRepository::new(state.db())
                .update(
                    &profile_id,
                    CustomerUpdate {
                        first_name: payload.first_name,
                        last_name: payload.last_name,
                        phone_number: payload.phone_number,
                        addresses: payload.addresses,
                    },
                )
                .await?;
            (Some(updated), None)
        }
        Role::Driver => {
            let updated = DriverRepository::new(state.db())
                .update(
                    &profile_id,
                    DriverUpdate {
                        first_name: payload.first_name,
                        last_name: payload.last_name,
                        phone_number: payload.phone_number,
                        vehicle_details: payload.vehicle_details,
                    },
                )
                .await?;
            (None, Some(updated))
        }
        Role::Admin => {
            return Err(AppError::invalid_request(
                "Admin accounts have no editable profile",
            ));
        }
    };

    let account = UserRepository::new(state.db())
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(ProfileResponse {
        user: account.into(),
        customer,
        driver,
    }))
}
