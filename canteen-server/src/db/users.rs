use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub employee_id: String,
    pub department_id: Option<i64>,
    pub hashed_password: String,
    pub is_kitchen_admin: bool,
    pub is_email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User profile with resolved department name
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub employee_id: String,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub is_kitchen_admin: bool,
    pub is_email_verified: bool,
    pub created_at: i64,
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: &'a str,
    pub employee_id: &'a str,
    pub department_id: Option<i64>,
    pub hashed_password: &'a str,
}

pub async fn create(pool: &PgPool, user: NewUser<'_>, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, username, first_name, last_name, phone_number,
                            employee_id, department_id, hashed_password, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)",
    )
    .bind(user.id)
    .bind(user.email)
    .bind(user.username)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.phone_number)
    .bind(user.employee_id)
    .bind(user.department_id)
    .bind(user.hashed_password)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a non-admin employee by email (used for admin-assisted orders)
pub async fn find_employee_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1 AND NOT is_kitchen_admin")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn set_verified(pool: &PgPool, user_id: &str, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_email_verified = TRUE, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    user_id: &str,
    hashed_password: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET hashed_password = $1, updated_at = $2 WHERE id = $3")
        .bind(hashed_password)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_profile(pool: &PgPool, user_id: &str) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.phone_number,
                u.employee_id, u.department_id, d.name AS department_name,
                u.is_kitchen_admin, u.is_email_verified, u.created_at
         FROM users u
         LEFT JOIN departments d ON d.id = u.department_id
         WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub employee_id: Option<String>,
    pub department_id: Option<i64>,
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: &str,
    upd: ProfileUpdate,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            phone_number = COALESCE($3, phone_number),
            employee_id = COALESCE($4, employee_id),
            department_id = COALESCE($5, department_id),
            updated_at = $6
         WHERE id = $7",
    )
    .bind(upd.first_name)
    .bind(upd.last_name)
    .bind(upd.phone_number)
    .bind(upd.employee_id)
    .bind(upd.department_id)
    .bind(now)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
