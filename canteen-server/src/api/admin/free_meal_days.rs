//! Free-meal calendar management

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::{now_millis, parse_date};

/// GET /api/admin/free-meal-days
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::free_meal_days::FreeMealDay>> {
    let days = db::free_meal_days::list(&state.pool).await.map_err(|e| {
        tracing::error!("Free meal days query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(days))
}

/// POST /api/admin/free-meal-days
#[derive(Deserialize)]
pub struct CreateFreeMealDayRequest {
    /// YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub reason: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CreateFreeMealDayRequest>,
) -> ApiResult<db::free_meal_days::FreeMealDay> {
    let date = parse_date(&req.date)?;

    let day = db::free_meal_days::create(
        &state.pool,
        date,
        &req.reason,
        &identity.user_id,
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Free meal day create error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::FreeMealDayExists))?;

    tracing::info!(date = %day.date, "Free meal day registered");

    Ok(Json(day))
}

/// PUT /api/admin/free-meal-days/{id}
#[derive(Deserialize)]
pub struct UpdateFreeMealDayRequest {
    pub reason: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFreeMealDayRequest>,
) -> ApiResult<db::free_meal_days::FreeMealDay> {
    let day = db::free_meal_days::update(&state.pool, id, req.reason, req.is_active)
        .await
        .map_err(|e| {
            tracing::error!("Free meal day update error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::FreeMealDayNotFound))?;

    Ok(Json(day))
}

/// DELETE /api/admin/free-meal-days/{id} — deactivates, never removes
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    let deactivated = db::free_meal_days::deactivate(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Free meal day deactivate error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    if !deactivated {
        return Err(AppError::new(ErrorCode::FreeMealDayNotFound));
    }

    tracing::info!(free_meal_day_id = id, "Free meal day deactivated");

    Ok(Json(json!({ "message": "Free meal day deactivated" })))
}
