use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::orders::MealSnapshot;

#[derive(sqlx::FromRow)]
pub struct Meal {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub max_per_person: i32,
    pub units_available: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Meal with resolved category name, as served to clients
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct MealWithCategory {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub max_per_person: i32,
    pub units_available: Option<i32>,
    pub has_units_left: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

const WITH_CATEGORY: &str = "SELECT m.id, m.category_id, c.name AS category_name, m.name, m.description,
        m.price, m.image_url, m.is_available, m.max_per_person, m.units_available,
        (m.units_available IS NULL OR m.units_available > 0) AS has_units_left,
        m.created_at, m.updated_at
 FROM meals m
 JOIN meal_categories c ON c.id = m.category_id";

pub async fn list_available(pool: &PgPool) -> Result<Vec<MealWithCategory>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{WITH_CATEGORY} WHERE m.is_available ORDER BY c.name, m.name"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<MealWithCategory>, sqlx::Error> {
    sqlx::query_as(&format!("{WITH_CATEGORY} ORDER BY c.name, m.name"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<MealWithCategory>, sqlx::Error> {
    sqlx::query_as(&format!("{WITH_CATEGORY} WHERE m.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Load validation/pricing snapshots for the requested meal ids
pub async fn snapshots(pool: &PgPool, ids: &[i64]) -> Result<Vec<MealSnapshot>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        name: String,
        price: Decimal,
        is_available: bool,
        max_per_person: i32,
        units_available: Option<i32>,
    }

    let rows: Vec<Row> = sqlx::query_as(
        "SELECT id, name, price, is_available, max_per_person, units_available
         FROM meals WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| MealSnapshot {
            id: r.id,
            name: r.name,
            price: r.price,
            is_available: r.is_available,
            max_per_person: r.max_per_person,
            units_available: r.units_available,
        })
        .collect())
}

pub struct NewMeal {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub max_per_person: i32,
    pub units_available: Option<i32>,
}

pub async fn create(pool: &PgPool, meal: NewMeal, now: i64) -> Result<Meal, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO meals (category_id, name, description, price, image_url, is_available,
                            max_per_person, units_available, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING *",
    )
    .bind(meal.category_id)
    .bind(meal.name)
    .bind(meal.description)
    .bind(meal.price)
    .bind(meal.image_url)
    .bind(meal.is_available)
    .bind(meal.max_per_person)
    .bind(meal.units_available)
    .bind(now)
    .fetch_one(pool)
    .await
}

#[derive(Default)]
pub struct MealUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<Option<String>>,
    pub is_available: Option<bool>,
    pub max_per_person: Option<i32>,
    pub units_available: Option<Option<i32>>,
}

/// Fetch-merge-write update; nullable columns (`image_url`, `units_available`)
/// can be cleared by passing `Some(None)`.
pub async fn update(
    pool: &PgPool,
    id: i64,
    upd: MealUpdate,
    now: i64,
) -> Result<Option<Meal>, sqlx::Error> {
    let existing: Option<Meal> = sqlx::query_as("SELECT * FROM meals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(existing) = existing else {
        return Ok(None);
    };

    let meal = sqlx::query_as(
        "UPDATE meals SET
            category_id = $1, name = $2, description = $3, price = $4, image_url = $5,
            is_available = $6, max_per_person = $7, units_available = $8, updated_at = $9
         WHERE id = $10
         RETURNING *",
    )
    .bind(upd.category_id.unwrap_or(existing.category_id))
    .bind(upd.name.unwrap_or(existing.name))
    .bind(upd.description.unwrap_or(existing.description))
    .bind(upd.price.unwrap_or(existing.price))
    .bind(upd.image_url.unwrap_or(existing.image_url))
    .bind(upd.is_available.unwrap_or(existing.is_available))
    .bind(upd.max_per_person.unwrap_or(existing.max_per_person))
    .bind(upd.units_available.unwrap_or(existing.units_available))
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(meal))
}

pub async fn has_order_items(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM order_items WHERE meal_id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Retire a meal that has order history instead of deleting it
pub async fn set_unavailable(pool: &PgPool, id: i64, now: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE meals SET is_available = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
