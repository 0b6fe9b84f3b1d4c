//! Authentication handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{auth, AppError, AppState, AuthUser};
use reverie_core::models::User;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response carrying a session token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/auth/register - Create an account and issue a token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(AppError::bad_request("Name, email, and password are required"));
    }

    if state.db.find_user_by_email(&email)?.is_some() {
        return Err(AppError::bad_request("User already exists"));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let user = state.db.create_user(name, &email, &password_hash)?;
    info!(user_id = user.id, "User registered");

    let token = auth::issue_token(user.id, &state.config.jwt_secret)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /api/auth/login - Verify credentials and issue a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let found = state.db.find_user_by_email(&email)?;
    let Some((user, password_hash)) = found else {
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !auth::verify_password(&body.password, &password_hash) {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = auth::issue_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(TokenResponse { token }))
}

/// GET /api/me - Current user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(auth_user.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}
