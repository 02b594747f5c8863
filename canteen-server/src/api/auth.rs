//! Authentication endpoints: login, logout, forgot-password, reset-password

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use std::time::Duration;

use crate::auth::{UserIdentity, create_token};
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, now_millis, verify_password};

use super::ApiResult;
use super::register::{PURPOSE_PASSWORD_RESET, check_otp, issue_code};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

// ── POST /api/auth/login ──

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: db::users::UserProfile,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    // Fixed delay to prevent timing attacks (before checking the result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let Some(user) = user else {
        tracing::warn!(email = %email, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &user.hashed_password) {
        tracing::warn!(email = %email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    if !user.is_email_verified {
        return Err(AppError::new(ErrorCode::EmailNotVerified));
    }

    let token = create_token(&user.id, &user.email, user.is_kitchen_admin, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let profile = db::users::get_profile(&state.pool, &user.id)
        .await
        .map_err(|e| {
            tracing::error!("Profile query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(user_id = %user.id, email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: profile,
    }))
}

// ── POST /api/auth/logout ──

pub async fn logout(Extension(identity): Extension<UserIdentity>) -> ApiResult<Value> {
    tracing::info!(
        user_id = %identity.user_id,
        email = %identity.email,
        "User logged out"
    );

    Ok(Json(json!({ "message": "Logged out successfully." })))
}

// ── POST /api/auth/forgot-password ──

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    // Always return OK to prevent email enumeration; delivery is best-effort
    // here for the same reason.
    if let Ok(Some(_)) = db::users::find_by_email(&state.pool, &email).await {
        if let Err(e) = issue_code(&state, &email, PURPOSE_PASSWORD_RESET).await {
            tracing::warn!(email = %email, error = %e, "Password reset code not delivered");
        }
    }

    Ok(Json(json!({
        "message": "If the email exists, a reset code has been sent"
    })))
}

// ── POST /api/auth/reset-password ──

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    if req.new_password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.new_password != req.confirm_password {
        return Err(AppError::new(ErrorCode::PasswordMismatch));
    }

    check_otp(&state.pool, &email, PURPOSE_PASSWORD_RESET, &req.code).await?;

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error finding user: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let hashed = hash_password(&req.new_password).map_err(|e| {
        tracing::error!("Password hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    db::users::update_password(&state.pool, &user.id, &hashed, now_millis())
        .await
        .map_err(|e| {
            tracing::error!("Failed to update password: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let _ = db::email_verifications::delete(&state.pool, &email, PURPOSE_PASSWORD_RESET).await;

    tracing::info!(user_id = %user.id, "Password reset");

    Ok(Json(json!({ "message": "Password reset successfully." })))
}
