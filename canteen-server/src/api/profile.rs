//! Own-profile endpoints

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;

use super::ApiResult;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<db::users::UserProfile> {
    let profile = db::users::get_profile(&state.pool, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Profile query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(profile))
}

/// PUT /api/profile
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub employee_id: Option<String>,
    pub department_id: Option<i64>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<db::users::UserProfile> {
    if let Some(department_id) = req.department_id {
        db::departments::find_active_by_id(&state.pool, department_id)
            .await
            .map_err(|e| {
                tracing::error!("DB error checking department: {e}");
                AppError::new(ErrorCode::InternalError)
            })?
            .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;
    }

    db::users::update_profile(
        &state.pool,
        &identity.user_id,
        db::users::ProfileUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            employee_id: req.employee_id,
            department_id: req.department_id,
        },
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Profile update error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let profile = db::users::get_profile(&state.pool, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Profile query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(profile))
}
