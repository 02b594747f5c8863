//! Employee dashboard stats

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/dashboard — own order counts and spend
pub async fn customer_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<db::stats::CustomerDashboardStats> {
    let stats = db::stats::customer_dashboard(&state.pool, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Customer dashboard query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(stats))
}
