use sqlx::PgPool;

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: i64,
}

/// Category with its available-meal count
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub meals_count: i64,
    pub created_at: i64,
}

pub async fn list(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
    sqlx::query_as(
        "SELECT c.id, c.name, c.description,
                (SELECT COUNT(*) FROM meals m
                 WHERE m.category_id = c.id AND m.is_available) AS meals_count,
                c.created_at
         FROM meal_categories c
         ORDER BY c.name",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM meal_categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM meal_categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Returns None when the name is already taken.
pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    now: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO meal_categories (name, description, created_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (name) DO NOTHING
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: Option<String>,
    description: Option<String>,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE meal_categories SET
            name = COALESCE($1, name),
            description = COALESCE($2, description)
         WHERE id = $3
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn meals_count(pool: &PgPool, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM meals WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM meal_categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
