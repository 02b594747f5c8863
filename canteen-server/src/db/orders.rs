//! Order persistence
//!
//! Order creation runs inside one transaction: the order row, its frozen line
//! items, the conditional inventory decrements and the admin notification all
//! commit together or not at all.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::error::ServiceError;
use crate::orders::{MealSnapshot, OrderStatus, PricedOrder};

#[derive(Debug, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub status: String,
    pub total_amount: Decimal,
    pub is_free_meal: bool,
    pub notes: String,
    pub admin_notes: String,
    pub created_by_admin: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Parse the stored status string
    pub fn parsed_status(&self) -> Result<OrderStatus, AppError> {
        OrderStatus::from_db(&self.status).ok_or_else(|| {
            AppError::internal(format!("Order {} has unknown status '{}'", self.id, self.status))
        })
    }
}

/// Order summary row with user/department context
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_department: Option<String>,
    pub status: String,
    pub total_amount: Decimal,
    pub is_free_meal: bool,
    pub is_admin_created: bool,
    pub items_count: i64,
    pub notes: String,
    pub admin_notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line with frozen pricing, as served to clients
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub id: i64,
    pub meal_id: i64,
    pub meal_name: String,
    pub quantity: i32,
    pub price_per_item: Decimal,
    pub subtotal: Decimal,
}

const SUMMARY: &str = "SELECT o.id, u.first_name || ' ' || u.last_name AS user_name,
        u.email AS user_email, d.name AS user_department,
        o.status, o.total_amount, o.is_free_meal,
        (o.created_by_admin IS NOT NULL) AS is_admin_created,
        (SELECT COALESCE(SUM(oi.quantity), 0)::bigint
         FROM order_items oi WHERE oi.order_id = o.id) AS items_count,
        o.notes, o.admin_notes, o.created_at, o.updated_at
 FROM orders o
 JOIN users u ON u.id = o.user_id
 LEFT JOIN departments d ON d.id = u.department_id";

pub struct NewOrder<'a> {
    pub user_id: &'a str,
    pub user_name: &'a str,
    pub notes: &'a str,
    pub admin_notes: &'a str,
    pub created_by_admin: Option<&'a str>,
    pub is_free_meal: bool,
    pub priced: &'a PricedOrder,
    pub meals: &'a [MealSnapshot],
}

/// Create an order with its items, decrement finite inventory and record the
/// admin notification — all in one transaction.
///
/// The inventory decrement is a conditional atomic update
/// (`units_available >= quantity` in the WHERE clause): a concurrent order
/// that consumed the remaining units turns this into a zero-row update, and
/// the whole transaction rolls back with the same business-rule rejection as
/// an ordinary stock violation.
pub async fn create(pool: &PgPool, new: NewOrder<'_>) -> Result<Order, ServiceError> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let status = if new.is_free_meal {
        OrderStatus::Free
    } else {
        OrderStatus::Pending
    };

    let order: Order = sqlx::query_as(
        "INSERT INTO orders (user_id, status, total_amount, is_free_meal, notes, admin_notes,
                             created_by_admin, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(status.as_str())
    .bind(new.priced.total)
    .bind(new.is_free_meal)
    .bind(new.notes)
    .bind(new.admin_notes)
    .bind(new.created_by_admin)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for line in &new.priced.lines {
        sqlx::query(
            "INSERT INTO order_items (order_id, meal_id, quantity, price_per_item, subtotal)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order.id)
        .bind(line.meal_id)
        .bind(line.quantity)
        .bind(line.price_per_item)
        .bind(line.subtotal)
        .execute(&mut *tx)
        .await?;
    }

    for line in &new.priced.lines {
        let meal = new
            .meals
            .iter()
            .find(|m| m.id == line.meal_id)
            .expect("priced lines come from these snapshots");
        if meal.units_available.is_none() {
            continue;
        }

        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE meals SET units_available = units_available - $1, updated_at = $2
             WHERE id = $3 AND units_available >= $1
             RETURNING units_available",
        )
        .bind(line.quantity)
        .bind(now)
        .bind(line.meal_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining) = remaining else {
            return Err(ServiceError::App(AppError::with_message(
                ErrorCode::MealInsufficientUnits,
                format!("Not enough units of {} left.", meal.name),
            )));
        };

        if remaining == 0 {
            sqlx::query(
                "INSERT INTO admin_notifications
                    (notification_type, title, message, related_meal_id, created_at)
                 VALUES ('low_stock', $1, $2, $3, $4)",
            )
            .bind(format!("Low Stock: {}", meal.name))
            .bind(format!("{} is out of stock.", meal.name))
            .bind(meal.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query(
        "INSERT INTO admin_notifications
            (notification_type, title, message, related_order_id, created_at)
         VALUES ('new_order', $1, $2, $3, $4)",
    )
    .bind(format!("New Order #{}", order.id))
    .bind(format!(
        "Order from {} - KSh {}",
        new.user_name, order.total_amount
    ))
    .bind(order.id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id = %order.user_id,
        total = %order.total_amount,
        free = order.is_free_meal,
        "Order created"
    );

    Ok(order)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_for_user(
    pool: &PgPool,
    id: i64,
    user_id: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn summary_by_id(pool: &PgPool, id: i64) -> Result<Option<OrderSummary>, sqlx::Error> {
    sqlx::query_as(&format!("{SUMMARY} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<OrderSummary>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{SUMMARY} WHERE o.user_id = $1 ORDER BY o.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

#[derive(Default)]
pub struct OrderFilters {
    /// Inclusive start, Unix millis
    pub from: Option<i64>,
    /// Exclusive end, Unix millis
    pub to: Option<i64>,
    pub status: Option<String>,
    pub department_id: Option<i64>,
}

pub async fn list_all(
    pool: &PgPool,
    filters: OrderFilters,
) -> Result<Vec<OrderSummary>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{SUMMARY}
         WHERE ($1::bigint IS NULL OR o.created_at >= $1)
           AND ($2::bigint IS NULL OR o.created_at < $2)
           AND ($3::text IS NULL OR o.status = $3)
           AND ($4::bigint IS NULL OR u.department_id = $4)
         ORDER BY o.created_at DESC"
    ))
    .bind(filters.from)
    .bind(filters.to)
    .bind(filters.status)
    .bind(filters.department_id)
    .fetch_all(pool)
    .await
}

pub async fn list_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItemDetail>, sqlx::Error> {
    sqlx::query_as(
        "SELECT oi.id, oi.meal_id, m.name AS meal_name, oi.quantity, oi.price_per_item, oi.subtotal
         FROM order_items oi
         JOIN meals m ON m.id = oi.meal_id
         WHERE oi.order_id = $1
         ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

/// Apply a guarded status transition
pub async fn update_status(
    pool: &PgPool,
    order: &Order,
    next: OrderStatus,
    admin_notes: Option<&str>,
) -> Result<Order, ServiceError> {
    let current = order.parsed_status().map_err(ServiceError::App)?;

    if !current.can_transition_to(next) {
        return Err(ServiceError::App(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change order status from {current} to {next}"),
        )));
    }

    let updated: Order = sqlx::query_as(
        "UPDATE orders SET status = $1, admin_notes = COALESCE($2, admin_notes), updated_at = $3
         WHERE id = $4
         RETURNING *",
    )
    .bind(next.as_str())
    .bind(admin_notes)
    .bind(now_millis())
    .bind(order.id)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        order_id = order.id,
        from = %current,
        to = %next,
        "Order status updated"
    );

    Ok(updated)
}
