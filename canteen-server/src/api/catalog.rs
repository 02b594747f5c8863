//! Catalog browsing (employee-facing)

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/categories — categories with available-meal counts
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::categories::CategoryWithCount>> {
    let categories = db::categories::list(&state.pool).await.map_err(|e| {
        tracing::error!("Categories query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(categories))
}

/// GET /api/meals — currently available meals
pub async fn list_meals(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::meals::MealWithCategory>> {
    let meals = db::meals::list_available(&state.pool).await.map_err(|e| {
        tracing::error!("Meals query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(meals))
}

/// GET /api/meals/{id}
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<db::meals::MealWithCategory> {
    let meal = db::meals::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Meal query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MealNotFound))?;

    Ok(Json(meal))
}
