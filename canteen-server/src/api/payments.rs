//! Payment endpoints (employee-facing)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::orders::pricing;
use crate::state::AppState;

use super::ApiResult;

/// Payment payload with order context and derived figures
#[derive(Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub order_id: i64,
    pub transaction_code: String,
    pub amount_paid: Decimal,
    pub phone_number: String,
    pub amount_remaining: Decimal,
    pub is_fully_paid: bool,
    pub is_verified: bool,
    pub verification_notes: String,
    pub created_at: i64,
    pub verified_at: Option<i64>,
    pub order_details: OrderDetails,
}

#[derive(Serialize)]
pub struct OrderDetails {
    pub id: i64,
    pub total_amount: Decimal,
    pub customer: String,
    pub customer_email: String,
}

impl From<db::payments::PaymentDetail> for PaymentResponse {
    fn from(p: db::payments::PaymentDetail) -> Self {
        Self {
            id: p.id,
            order_id: p.order_id,
            transaction_code: p.transaction_code,
            amount_paid: p.amount_paid,
            phone_number: p.phone_number,
            amount_remaining: pricing::amount_remaining(p.order_total, p.amount_paid),
            is_fully_paid: pricing::is_fully_paid(p.order_total, p.amount_paid),
            is_verified: p.is_verified,
            verification_notes: p.verification_notes,
            created_at: p.created_at,
            verified_at: p.verified_at,
            order_details: OrderDetails {
                id: p.order_id,
                total_amount: p.order_total,
                customer: p.customer_name,
                customer_email: p.customer_email,
            },
        }
    }
}

// ── POST /api/payments ──

#[derive(Deserialize)]
pub struct SubmitPaymentRequest {
    pub order_id: i64,
    pub transaction_code: String,
    pub amount_paid: Decimal,
    #[serde(default)]
    pub phone_number: String,
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<SubmitPaymentRequest>,
) -> ApiResult<PaymentResponse> {
    let transaction_code = req.transaction_code.trim();
    if transaction_code.is_empty() {
        return Err(AppError::validation("Transaction code must not be empty"));
    }
    if req.amount_paid < Decimal::ZERO {
        return Err(AppError::validation("Amount paid must not be negative"));
    }

    // Payments only against own orders
    let order = db::orders::find_for_user(&state.pool, req.order_id, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Order query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let payment = db::payments::submit(
        &state.pool,
        &order,
        db::payments::NewPayment {
            transaction_code,
            amount_paid: req.amount_paid,
            phone_number: &req.phone_number,
        },
    )
    .await?;

    let detail = db::payments::detail_by_id(&state.pool, payment.id)
        .await
        .map_err(|e| {
            tracing::error!("Payment query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    Ok(Json(detail.into()))
}

// ── GET /api/payments/{id} ──

pub async fn detail(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<PaymentResponse> {
    let payment = db::payments::detail_for_user(&state.pool, id, &identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Payment query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    Ok(Json(payment.into()))
}
