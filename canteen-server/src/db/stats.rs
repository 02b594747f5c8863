//! Dashboard aggregation queries
//!
//! All figures are recomputed per request; there is no incremental
//! materialization.

use rust_decimal::Decimal;
use sqlx::PgPool;

/// Kitchen-admin dashboard figures for a date window
#[derive(serde::Serialize)]
pub struct AdminDashboardStats {
    pub total_orders: i64,
    /// Sum of totals over non-free orders only
    pub total_revenue: Decimal,
    pub free_meal_orders: i64,
    pub admin_created_orders: i64,
    pub pending_payments: i64,
    pub active_meals: i64,
    pub total_customers: i64,
}

pub async fn admin_dashboard(
    pool: &PgPool,
    from: i64,
    to: i64,
) -> Result<AdminDashboardStats, sqlx::Error> {
    let (total_orders, total_revenue, free_meal_orders, admin_created_orders): (
        i64,
        Decimal,
        i64,
        i64,
    ) = sqlx::query_as(
        "SELECT COUNT(*),
                COALESCE(SUM(total_amount) FILTER (WHERE NOT is_free_meal), 0),
                COUNT(*) FILTER (WHERE is_free_meal),
                COUNT(*) FILTER (WHERE created_by_admin IS NOT NULL)
         FROM orders
         WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    let pending_payments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE NOT is_verified")
            .fetch_one(pool)
            .await?;

    let active_meals: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meals WHERE is_available")
        .fetch_one(pool)
        .await?;

    let total_customers: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE NOT is_kitchen_admin")
            .fetch_one(pool)
            .await?;

    Ok(AdminDashboardStats {
        total_orders,
        total_revenue,
        free_meal_orders,
        admin_created_orders,
        pending_payments,
        active_meals,
        total_customers,
    })
}

/// Employee dashboard figures
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct CustomerDashboardStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub total_spent: Decimal,
}

pub async fn customer_dashboard(
    pool: &PgPool,
    user_id: &str,
) -> Result<CustomerDashboardStats, sqlx::Error> {
    sqlx::query_as(
        "SELECT COUNT(*) AS total_orders,
                COUNT(*) FILTER (WHERE status IN ('pending', 'paid')) AS pending_orders,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_orders,
                COALESCE(SUM(total_amount), 0) AS total_spent
         FROM orders
         WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Count/revenue rollup for a date-range report
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct DateRangeSummary {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub free_meal_orders: i64,
}

pub async fn date_range_summary(
    pool: &PgPool,
    from: i64,
    to: i64,
) -> Result<DateRangeSummary, sqlx::Error> {
    sqlx::query_as(
        "SELECT COUNT(*) AS total_orders,
                COALESCE(SUM(total_amount) FILTER (WHERE NOT is_free_meal), 0) AS total_revenue,
                COUNT(*) FILTER (WHERE is_free_meal) AS free_meal_orders
         FROM orders
         WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await
}
