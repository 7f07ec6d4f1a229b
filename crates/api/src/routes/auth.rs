//! Registration, login, and profile routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use common::models::{Role, User};
use common::Error;
use serde::{Deserialize, Serialize};

use crate::auth::{issue_token, Caller};
use crate::error::{ApiError, ApiResult, DbResultExt, OptionExt};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Register a new user
/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError(Error::Validation(
            "username and password are required".to_string(),
        )));
    }
    if !req.email.contains('@') {
        return Err(ApiError(Error::Validation(
            "email address is not valid".to_string(),
        )));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError(Error::Internal(e.to_string())))?;

    let user = db::users::insert(
        &state.pool,
        req.username.trim(),
        &req.email,
        &password_hash,
        Role::Player,
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError(Error::Conflict(
                "username or email is already taken".to_string(),
            ))
        } else {
            ApiError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive an access token
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let invalid = || ApiError(Error::Unauthorized("invalid credentials".to_string()));

    let user = db::users::get_by_username(&state.pool, &req.username)
        .await
        .db_err()?
        .ok_or_else(invalid)?;

    let verified = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| ApiError(Error::Internal(e.to_string())))?;
    if !verified {
        return Err(invalid());
    }

    let expires_at = Utc::now() + Duration::hours(state.config.token_ttl_hours);
    let token = issue_token(&state.config.auth_secret, user.id, user.role, expires_at)?;

    Ok(Json(LoginResponse { token, user }))
}

/// The authenticated user's own record
/// GET /api/auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<User>> {
    let user = db::users::get_by_id(&state.pool, caller.id)
        .await
        .db_err()?
        .not_found("User not found")?;
    Ok(Json(user))
}
