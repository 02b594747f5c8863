use sqlx::PgPool;

/// Append-only admin notification log entry
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_order_id: Option<i64>,
    pub related_meal_id: Option<i64>,
    pub created_at: i64,
}

pub async fn list(
    pool: &PgPool,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM admin_notifications
         WHERE (NOT $1 OR NOT is_read)
         ORDER BY created_at DESC
         LIMIT $2",
    )
    .bind(unread_only)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn mark_read(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE admin_notifications SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_unread(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM admin_notifications WHERE NOT is_read")
        .fetch_one(pool)
        .await
}
