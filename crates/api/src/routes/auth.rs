//! Authentication routes for account registration and login.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::account::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::AuthService;

/// Register a new account with email and password.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    request.validate()?;

    let account = AuthService::new(state.pool.clone(), &state.jwt)
        .register(
            &request.email,
            &request.name,
            &request.password,
            request.avatar.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Login with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let response = AuthService::new(state.pool.clone(), &state.jwt)
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}
