use chrono::NaiveDate;
use sqlx::PgPool;

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct FreeMealDay {
    pub id: i64,
    pub date: NaiveDate,
    pub reason: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: i64,
}

/// A date is a free-meal day iff an active record exists for that exact date.
pub async fn is_free_meal_day(pool: &PgPool, date: NaiveDate) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM free_meal_days WHERE date = $1 AND is_active)")
        .bind(date)
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<FreeMealDay>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM free_meal_days ORDER BY date DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<FreeMealDay>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM free_meal_days WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns None when a record for the date already exists (unique date);
/// past designations are reactivated through update, not re-created.
pub async fn create(
    pool: &PgPool,
    date: NaiveDate,
    reason: &str,
    created_by: &str,
    now: i64,
) -> Result<Option<FreeMealDay>, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO free_meal_days (date, reason, created_by, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (date) DO NOTHING
         RETURNING *",
    )
    .bind(date)
    .bind(reason)
    .bind(created_by)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    reason: Option<String>,
    is_active: Option<bool>,
) -> Result<Option<FreeMealDay>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE free_meal_days SET
            reason = COALESCE($1, reason),
            is_active = COALESCE($2, is_active)
         WHERE id = $3
         RETURNING *",
    )
    .bind(reason)
    .bind(is_active)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Soft delete: designations are deactivated, never removed.
pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE free_meal_days SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
