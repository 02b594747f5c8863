//! Payment verification and management

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::api::payments::PaymentResponse;
use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;

/// GET /api/admin/payments?is_verified=
#[derive(Deserialize)]
pub struct PaymentsQuery {
    pub is_verified: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
) -> ApiResult<Vec<PaymentResponse>> {
    let payments = db::payments::list_all(&state.pool, query.is_verified)
        .await
        .map_err(|e| {
            tracing::error!("Payments query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/payments/{id}
pub async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<PaymentResponse> {
    let payment = db::payments::detail_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Payment query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    Ok(Json(payment.into()))
}

/// PUT /api/admin/payments/{id} — update amount/verification/notes
///
/// When the payment ends up verified with the amount covering the order
/// total, the order is promoted to `confirmed`.
#[derive(Deserialize)]
pub struct UpdatePaymentRequest {
    pub amount_paid: Option<Decimal>,
    pub is_verified: Option<bool>,
    pub verification_notes: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePaymentRequest>,
) -> ApiResult<PaymentResponse> {
    if let Some(amount) = req.amount_paid
        && amount < Decimal::ZERO
    {
        return Err(AppError::validation("Amount paid must not be negative"));
    }

    db::payments::admin_update(
        &state.pool,
        id,
        db::payments::PaymentUpdate {
            amount_paid: req.amount_paid,
            is_verified: req.is_verified,
            verification_notes: req.verification_notes,
        },
        &identity.user_id,
    )
    .await?;

    let payment = db::payments::detail_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Payment query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    Ok(Json(payment.into()))
}
