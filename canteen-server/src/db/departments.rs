use sqlx::PgPool;

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: i64,
}

/// Department with its non-admin employee count
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct DepartmentWithCount {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub employees_count: i64,
    pub created_at: i64,
}

const WITH_COUNT: &str = "SELECT d.id, d.name, d.description, d.is_active,
        (SELECT COUNT(*) FROM users u
         WHERE u.department_id = d.id AND NOT u.is_kitchen_admin) AS employees_count,
        d.created_at
 FROM departments d";

pub async fn list_active(pool: &PgPool) -> Result<Vec<DepartmentWithCount>, sqlx::Error> {
    sqlx::query_as(&format!("{WITH_COUNT} WHERE d.is_active ORDER BY d.name"))
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<DepartmentWithCount>, sqlx::Error> {
    sqlx::query_as(&format!("{WITH_COUNT} ORDER BY d.name"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active_by_id(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM departments WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns None when the name is already taken.
pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    created_by: &str,
    now: i64,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO departments (name, description, created_by, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (name) DO NOTHING
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(created_by)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM departments WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE departments SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            is_active = COALESCE($3, is_active)
         WHERE id = $4
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(is_active)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Soft delete: departments are deactivated to preserve order attribution.
pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE departments SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
