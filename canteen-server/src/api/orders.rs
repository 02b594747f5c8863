//! Order endpoints (employee-facing)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use sqlx::PgPool;

use crate::auth::UserIdentity;
use crate::db;
use crate::orders::{ItemRequest, pricing};
use crate::state::AppState;
use crate::util::today;

use super::ApiResult;

// ── Response types ──

/// Payment figures embedded in an order response
#[derive(Serialize)]
pub struct PaymentInfo {
    pub transaction_code: String,
    pub amount_paid: rust_decimal::Decimal,
    pub amount_remaining: rust_decimal::Decimal,
    pub is_verified: bool,
    pub is_fully_paid: bool,
}

/// Full order payload: summary, frozen line items, payment figures
#[derive(Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: db::orders::OrderSummary,
    pub items: Vec<db::orders::OrderItemDetail>,
    pub payment_info: Option<PaymentInfo>,
}

/// Assemble the full order payload served by both employee and admin routes
pub(crate) async fn load_order_response(
    pool: &PgPool,
    order_id: i64,
) -> Result<OrderResponse, AppError> {
    let order = db::orders::summary_by_id(pool, order_id)
        .await
        .map_err(|e| {
            tracing::error!("Order query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let items = db::orders::list_items(pool, order_id).await.map_err(|e| {
        tracing::error!("Order items query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let payment_info = db::payments::find_by_order(pool, order_id)
        .await
        .map_err(|e| {
            tracing::error!("Payment query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .map(|p| PaymentInfo {
            transaction_code: p.transaction_code,
            amount_paid: p.amount_paid,
            amount_remaining: pricing::amount_remaining(order.total_amount, p.amount_paid),
            is_verified: p.is_verified,
            is_fully_paid: pricing::is_fully_paid(order.total_amount, p.amount_paid),
        });

    Ok(OrderResponse {
        order,
        items,
        payment_info,
    })
}

// ── POST /api/orders ──

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub notes: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let user = db::users::find_by_id(&state.pool, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("User query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let order = place_order(&state, &user, &req.items, &req.notes, "", None).await?;

    Ok(Json(load_order_response(&state.pool, order.id).await?))
}

/// Shared creation path for self-service and admin-assisted orders:
/// one validation/pricing pass, one transactional write.
pub(crate) async fn place_order(
    state: &AppState,
    user: &db::users::User,
    items: &[ItemRequest],
    notes: &str,
    admin_notes: &str,
    created_by_admin: Option<&str>,
) -> Result<db::orders::Order, AppError> {
    let meal_ids: Vec<i64> = items.iter().map(|i| i.meal_id).collect();
    let meals = db::meals::snapshots(&state.pool, &meal_ids)
        .await
        .map_err(|e| {
            tracing::error!("Meal snapshot query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    // Free-meal determination is frozen onto the order at creation time
    let is_free_meal = db::free_meal_days::is_free_meal_day(&state.pool, today(state.timezone))
        .await
        .map_err(|e| {
            tracing::error!("Free meal day query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let priced = pricing::price_items(&meals, items, is_free_meal)?;

    let user_name = user.full_name();
    let order = db::orders::create(
        &state.pool,
        db::orders::NewOrder {
            user_id: &user.id,
            user_name: &user_name,
            notes,
            admin_notes,
            created_by_admin,
            is_free_meal,
            priced: &priced,
            meals: &meals,
        },
    )
    .await?;

    Ok(order)
}

// ── GET /api/orders ──

pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<db::orders::OrderSummary>> {
    let orders = db::orders::list_for_user(&state.pool, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Orders query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(orders))
}

// ── GET /api/orders/{id} ──

pub async fn detail(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<OrderResponse> {
    // Cross-user access reads as absent
    db::orders::find_for_user(&state.pool, id, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Order query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    Ok(Json(load_order_response(&state.pool, id).await?))
}

// ── GET /api/free-meal-today ──

pub async fn free_meal_today(State(state): State<AppState>) -> ApiResult<Value> {
    let date = today(state.timezone);
    let is_free = db::free_meal_days::is_free_meal_day(&state.pool, date)
        .await
        .map_err(|e| {
            tracing::error!("Free meal day query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(json!({
        "date": date.to_string(),
        "is_free_meal_day": is_free,
    })))
}
