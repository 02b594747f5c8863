//! Admin notification feed

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::db;
use crate::state::AppState;

/// GET /api/admin/notifications?unread_only=&limit=
#[derive(Deserialize)]
pub struct NotificationsQuery {
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<db::notifications::Notification>,
    pub unread_count: i64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> ApiResult<NotificationsResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let notifications = db::notifications::list(
        &state.pool,
        query.unread_only.unwrap_or(false),
        limit,
    )
    .await
    .map_err(|e| {
        tracing::error!("Notifications query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let unread_count = db::notifications::count_unread(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("Notifications count error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(NotificationsResponse {
        notifications,
        unread_count,
    }))
}

/// PUT /api/admin/notifications/{id}/read
pub async fn mark_read(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    let updated = db::notifications::mark_read(&state.pool, id).await.map_err(|e| {
        tracing::error!("Notification update error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !updated {
        return Err(AppError::not_found("Notification"));
    }

    Ok(Json(json!({ "message": "Notification marked as read" })))
}
