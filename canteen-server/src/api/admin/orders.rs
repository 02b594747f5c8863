//! Order management: full listing, on-behalf creation, status progression,
//! date-range reporting

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::api::orders::{OrderResponse, load_order_response, place_order};
use crate::auth::UserIdentity;
use crate::db;
use crate::orders::{ItemRequest, OrderStatus};
use crate::state::AppState;
use crate::util::{day_end_millis, day_start_millis, parse_date};

/// GET /api/admin/orders?date=&from=&to=&status=&department_id=
#[derive(Deserialize)]
pub struct OrdersQuery {
    /// Single day (YYYY-MM-DD); overrides from/to
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub department_id: Option<i64>,
}

fn build_filters(
    query: &OrdersQuery,
    tz: chrono_tz::Tz,
) -> Result<db::orders::OrderFilters, AppError> {
    let mut filters = db::orders::OrderFilters {
        department_id: query.department_id,
        ..Default::default()
    };

    if let Some(ref status) = query.status {
        let status = OrderStatus::from_db(status)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {status}")))?;
        filters.status = Some(status.as_str().to_string());
    }

    if let Some(ref date) = query.date {
        let date = parse_date(date)?;
        filters.from = Some(day_start_millis(date, tz));
        filters.to = Some(day_end_millis(date, tz));
    } else {
        if let Some(ref from) = query.from {
            filters.from = Some(day_start_millis(parse_date(from)?, tz));
        }
        if let Some(ref to) = query.to {
            filters.to = Some(day_end_millis(parse_date(to)?, tz));
        }
    }

    Ok(filters)
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Vec<db::orders::OrderSummary>> {
    let filters = build_filters(&query, state.timezone)?;

    let orders = db::orders::list_all(&state.pool, filters).await.map_err(|e| {
        tracing::error!("Orders query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(orders))
}

/// POST /api/admin/orders — place an order on an employee's behalf
#[derive(Deserialize)]
pub struct AdminCreateOrderRequest {
    pub user_email: String,
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub admin_notes: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<AdminCreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let email = req.user_email.trim().to_lowercase();

    let user = db::users::find_employee_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("User query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UserNotFound,
                "User with this email does not exist or is an admin",
            )
        })?;

    let order = place_order(
        &state,
        &user,
        &req.items,
        &req.notes,
        &req.admin_notes,
        Some(&identity.user_id),
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        target_user = %user.id,
        admin = %identity.user_id,
        "Admin-assisted order created"
    );

    Ok(Json(load_order_response(&state.pool, order.id).await?))
}

/// GET /api/admin/orders/{id}
pub async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<OrderResponse> {
    Ok(Json(load_order_response(&state.pool, id).await?))
}

/// PUT /api/admin/orders/{id} — guarded status transition + admin notes
#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let order = db::orders::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Order query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let next = match req.status {
        Some(ref status) => OrderStatus::from_db(status)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {status}")))?,
        None => order.parsed_status()?,
    };

    db::orders::update_status(&state.pool, &order, next, req.admin_notes.as_deref()).await?;

    Ok(Json(load_order_response(&state.pool, id).await?))
}

/// GET /api/admin/orders/date-range?from=YYYY-MM-DD&to=YYYY-MM-DD
#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
pub struct DateRangeReport {
    pub from: String,
    pub to: String,
    pub summary: db::stats::DateRangeSummary,
    pub orders: Vec<db::orders::OrderSummary>,
}

pub async fn date_range(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<DateRangeReport> {
    let from_date = parse_date(&query.from)?;
    let to_date = parse_date(&query.to)?;
    if from_date > to_date {
        return Err(AppError::validation("from must not be after to"));
    }

    let from = day_start_millis(from_date, state.timezone);
    let to = day_end_millis(to_date, state.timezone);

    let summary = db::stats::date_range_summary(&state.pool, from, to)
        .await
        .map_err(|e| {
            tracing::error!("Date range summary query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let orders = db::orders::list_all(
        &state.pool,
        db::orders::OrderFilters {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("Orders query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(DateRangeReport {
        from: from_date.to_string(),
        to: to_date.to_string(),
        summary,
        orders,
    }))
}
