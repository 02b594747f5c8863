//! Registration API handlers
//!
//! POST /api/auth/register     — create user (unverified) + send verification code
//! POST /api/auth/verify-email — verify code, mark the account verified
//! POST /api/auth/resend-code  — resend verification code

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use sqlx::PgPool;

use crate::db;
use crate::state::AppState;
use crate::util::{generate_code, hash_password, now_millis, verify_password};

use super::ApiResult;

/// OTP validity window
const OTP_VALIDITY_MS: i64 = 15 * 60 * 1000;
/// Verification attempts allowed per code
const MAX_OTP_ATTEMPTS: i32 = 3;

pub(crate) const PURPOSE_VERIFICATION: &str = "verification";
pub(crate) const PURPOSE_PASSWORD_RESET: &str = "password_reset";

// ── Request types ──

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub employee_id: String,
    pub department_id: Option<i64>,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

// ── Shared OTP check ──

/// Validate a submitted OTP: record must exist, be within its validity
/// window, have attempts left, and match the stored argon2 hash. Every
/// submission burns one attempt.
pub(crate) async fn check_otp(
    pool: &PgPool,
    email: &str,
    purpose: &str,
    code: &str,
) -> Result<(), AppError> {
    let record = db::email_verifications::find(pool, email, purpose)
        .await
        .map_err(|e| {
            tracing::error!("DB error finding verification: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

    let now = now_millis();
    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }
    if record.attempts >= MAX_OTP_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    db::email_verifications::increment_attempts(pool, email, purpose)
        .await
        .map_err(|e| {
            tracing::error!("Failed to increment attempts: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    if !verify_password(code, &record.code) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    Ok(())
}

/// Generate, store and email a fresh OTP for the given purpose.
/// Storing a new code resets the attempt counter and validity window.
pub(crate) async fn issue_code(
    state: &AppState,
    email: &str,
    purpose: &str,
) -> Result<(), AppError> {
    let code = generate_code();
    let code_hash = hash_password(&code).map_err(|e| {
        tracing::error!("Code hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let now = now_millis();
    db::email_verifications::upsert(&state.pool, email, purpose, &code_hash, now + OTP_VALIDITY_MS, now)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save verification code: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let send_result = match purpose {
        PURPOSE_PASSWORD_RESET => state.email.send_password_reset_code(email, &code).await,
        _ => state.email.send_verification_code(email, &code).await,
    };

    send_result.map_err(|e| {
        tracing::error!("Failed to send verification email: {e}");
        AppError::new(ErrorCode::EmailSendFailed)
    })
}

// ── POST /api/auth/register ──

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    // Validate
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if req.username.trim().is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.password != req.password_confirm {
        return Err(AppError::new(ErrorCode::PasswordMismatch));
    }

    if let Some(department_id) = req.department_id {
        db::departments::find_active_by_id(&state.pool, department_id)
            .await
            .map_err(|e| {
                tracing::error!("DB error checking department: {e}");
                AppError::new(ErrorCode::InternalError)
            })?
            .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;
    }

    // Check email not taken
    let existing = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error checking email: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists));
    }

    let hashed_password = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user_id = uuid::Uuid::new_v4().to_string();
    db::users::create(
        &state.pool,
        db::users::NewUser {
            id: &user_id,
            email: &email,
            username: req.username.trim(),
            first_name: &req.first_name,
            last_name: &req.last_name,
            phone_number: &req.phone_number,
            employee_id: &req.employee_id,
            department_id: req.department_id,
            hashed_password: &hashed_password,
        },
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to create user: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    issue_code(&state, &email, PURPOSE_VERIFICATION).await?;

    tracing::info!(user_id = %user_id, email = %email, "User registered, verification code sent");

    Ok(Json(json!({
        "email": email,
        "message": "Registration successful. Please check your email for the verification code."
    })))
}

// ── POST /api/auth/verify-email ──

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    check_otp(&state.pool, &email, PURPOSE_VERIFICATION, &req.code).await?;

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error finding user: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    db::users::set_verified(&state.pool, &user.id, now_millis())
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark user verified: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let _ = db::email_verifications::delete(&state.pool, &email, PURPOSE_VERIFICATION).await;

    tracing::info!(user_id = %user.id, email = %email, "Email verified");

    Ok(Json(json!({ "message": "Email verified successfully." })))
}

// ── POST /api/auth/resend-code ──

pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error finding user: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if user.is_email_verified {
        return Err(AppError::conflict("Email already verified"));
    }

    issue_code(&state, &email, PURPOSE_VERIFICATION).await?;

    tracing::info!(email = %email, "Verification code resent");

    Ok(Json(json!({ "message": "Verification code resent" })))
}
