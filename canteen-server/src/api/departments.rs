//! Department listing (employee-facing)

use axum::{Json, extract::State};
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/departments — active departments with employee counts
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::departments::DepartmentWithCount>> {
    let departments = db::departments::list_active(&state.pool).await.map_err(|e| {
        tracing::error!("Departments query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(departments))
}
