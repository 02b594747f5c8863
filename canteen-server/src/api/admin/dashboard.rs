//! Kitchen-admin dashboard

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::db;
use crate::state::AppState;
use crate::util::{day_end_millis, day_start_millis, parse_date, today};

/// GET /api/admin/dashboard?date=|from=&to=
///
/// Defaults to today (business timezone). All figures are recomputed per
/// request.
#[derive(Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<db::stats::AdminDashboardStats> {
    let tz = state.timezone;

    let (from, to) = match (&query.from, &query.to) {
        (Some(from), Some(to)) => {
            let from_date = parse_date(from)?;
            let to_date = parse_date(to)?;
            if from_date > to_date {
                return Err(AppError::validation("from must not be after to"));
            }
            (day_start_millis(from_date, tz), day_end_millis(to_date, tz))
        }
        _ => {
            let date = match &query.date {
                Some(date) => parse_date(date)?,
                None => today(tz),
            };
            (day_start_millis(date, tz), day_end_millis(date, tz))
        }
    };

    let stats = db::stats::admin_dashboard(&state.pool, from, to)
        .await
        .map_err(|e| {
            tracing::error!("Admin dashboard query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(stats))
}
