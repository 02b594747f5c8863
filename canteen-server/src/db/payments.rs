//! Payment persistence
//!
//! Submission and administrative verification both run inside one
//! transaction. The UNIQUE(order_id) constraint is the arbiter for duplicate
//! submissions; free-meal orders never accept a payment.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db::orders::Order;
use crate::error::ServiceError;
use crate::orders::{OrderStatus, pricing};

#[derive(Debug, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub transaction_code: String,
    pub amount_paid: Decimal,
    pub phone_number: String,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub verification_notes: String,
    pub created_at: i64,
    pub verified_at: Option<i64>,
}

/// Payment row joined with its order's frozen total and customer identity
#[derive(sqlx::FromRow)]
pub struct PaymentDetail {
    pub id: i64,
    pub order_id: i64,
    pub transaction_code: String,
    pub amount_paid: Decimal,
    pub phone_number: String,
    pub is_verified: bool,
    pub verification_notes: String,
    pub created_at: i64,
    pub verified_at: Option<i64>,
    pub order_total: Decimal,
    pub customer_name: String,
    pub customer_email: String,
}

const DETAIL: &str = "SELECT p.id, p.order_id, p.transaction_code, p.amount_paid, p.phone_number,
        p.is_verified, p.verification_notes, p.created_at, p.verified_at,
        o.total_amount AS order_total,
        u.first_name || ' ' || u.last_name AS customer_name,
        u.email AS customer_email
 FROM payments p
 JOIN orders o ON o.id = p.order_id
 JOIN users u ON u.id = o.user_id";

pub struct NewPayment<'a> {
    pub transaction_code: &'a str,
    pub amount_paid: Decimal,
    pub phone_number: &'a str,
}

/// Submit a payment against a non-free, payment-less order and force the
/// order status to `paid`.
pub async fn submit(
    pool: &PgPool,
    order: &Order,
    new: NewPayment<'_>,
) -> Result<Payment, ServiceError> {
    if order.is_free_meal {
        return Err(ServiceError::App(AppError::new(ErrorCode::PaymentNotAllowed)));
    }

    let status = order.parsed_status().map_err(ServiceError::App)?;
    if !status.can_transition_to(OrderStatus::Paid) {
        return Err(ServiceError::App(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot submit a payment for a {status} order"),
        )));
    }

    let mut tx = pool.begin().await?;
    let now = now_millis();

    // UNIQUE(order_id) decides duplicate submissions atomically
    let payment: Option<Payment> = sqlx::query_as(
        "INSERT INTO payments (order_id, transaction_code, amount_paid, phone_number, created_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (order_id) DO NOTHING
         RETURNING *",
    )
    .bind(order.id)
    .bind(new.transaction_code)
    .bind(new.amount_paid)
    .bind(new.phone_number)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(payment) = payment else {
        return Err(ServiceError::App(AppError::new(
            ErrorCode::PaymentAlreadyExists,
        )));
    };

    sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(OrderStatus::Paid.as_str())
        .bind(now)
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO admin_notifications
            (notification_type, title, message, related_order_id, created_at)
         VALUES ('payment_submitted', $1, $2, $3, $4)",
    )
    .bind(format!("Payment Submitted for Order #{}", order.id))
    .bind(format!(
        "Transaction code: {} - Amount: KSh {}",
        payment.transaction_code, payment.amount_paid
    ))
    .bind(order.id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        payment_id = payment.id,
        order_id = order.id,
        amount = %payment.amount_paid,
        "Payment submitted"
    );

    Ok(payment)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_order(pool: &PgPool, order_id: i64) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

pub async fn detail_by_id(pool: &PgPool, id: i64) -> Result<Option<PaymentDetail>, sqlx::Error> {
    sqlx::query_as(&format!("{DETAIL} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Payment detail scoped to the owning user (cross-user access reads as absent)
pub async fn detail_for_user(
    pool: &PgPool,
    id: i64,
    user_id: &str,
) -> Result<Option<PaymentDetail>, sqlx::Error> {
    sqlx::query_as(&format!("{DETAIL} WHERE p.id = $1 AND o.user_id = $2"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(
    pool: &PgPool,
    is_verified: Option<bool>,
) -> Result<Vec<PaymentDetail>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{DETAIL}
         WHERE ($1::boolean IS NULL OR p.is_verified = $1)
         ORDER BY p.created_at DESC"
    ))
    .bind(is_verified)
    .fetch_all(pool)
    .await
}

pub struct PaymentUpdate {
    pub amount_paid: Option<Decimal>,
    pub is_verified: Option<bool>,
    pub verification_notes: Option<String>,
}

/// Administrative amount/verification update.
///
/// When the payment ends up verified with the cumulative amount covering the
/// order total, the order is promoted to `confirmed`. Re-verifying an
/// already-confirmed payment with unchanged fields is a no-op.
pub async fn admin_update(
    pool: &PgPool,
    payment_id: i64,
    upd: PaymentUpdate,
    verifier_id: &str,
) -> Result<Payment, ServiceError> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let payment: Option<Payment> =
        sqlx::query_as("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
            .bind(payment_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(payment) = payment else {
        return Err(ServiceError::App(AppError::new(ErrorCode::PaymentNotFound)));
    };

    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(payment.order_id)
        .fetch_one(&mut *tx)
        .await?;

    let amount_paid = upd.amount_paid.unwrap_or(payment.amount_paid);
    let is_verified = upd.is_verified.unwrap_or(payment.is_verified);
    let verification_notes = upd
        .verification_notes
        .unwrap_or_else(|| payment.verification_notes.clone());

    let updated: Payment = sqlx::query_as(
        "UPDATE payments SET
            amount_paid = $1,
            is_verified = $2,
            verification_notes = $3,
            verified_by = CASE WHEN $2 THEN $4 ELSE verified_by END,
            verified_at = CASE WHEN $2 THEN COALESCE(verified_at, $5) ELSE verified_at END
         WHERE id = $6
         RETURNING *",
    )
    .bind(amount_paid)
    .bind(is_verified)
    .bind(verification_notes)
    .bind(verifier_id)
    .bind(now)
    .bind(payment_id)
    .fetch_one(&mut *tx)
    .await?;

    if pricing::confirms_order(is_verified, order.total_amount, amount_paid) {
        let status = order.parsed_status().map_err(ServiceError::App)?;
        if !status.can_transition_to(OrderStatus::Confirmed) {
            return Err(ServiceError::App(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot confirm a {status} order"),
            )));
        }
        if status != OrderStatus::Confirmed {
            sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(OrderStatus::Confirmed.as_str())
                .bind(now)
                .bind(order.id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        payment_id = payment_id,
        order_id = order.id,
        verified = is_verified,
        amount = %amount_paid,
        "Payment updated"
    );

    Ok(updated)
}

pub async fn count_unverified(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE NOT is_verified")
        .fetch_one(pool)
        .await
}
