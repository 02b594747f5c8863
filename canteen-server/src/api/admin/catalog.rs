//! Catalog management: categories and meals

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::db;
use crate::db::meals::{MealUpdate, NewMeal};
use crate::state::AppState;
use crate::util::now_millis;

// ── Categories ──

/// GET /api/admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::categories::CategoryWithCount>> {
    let categories = db::categories::list(&state.pool).await.map_err(|e| {
        tracing::error!("Categories query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(categories))
}

/// POST /api/admin/categories
#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<db::categories::Category> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name must not be empty"));
    }

    let category = db::categories::create(&state.pool, name, &req.description, now_millis())
        .await
        .map_err(|e| {
            tracing::error!("Category create error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNameExists))?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(Json(category))
}

/// GET /api/admin/categories/{id}
pub async fn category_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<db::categories::Category> {
    let category = db::categories::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Category query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    Ok(Json(category))
}

/// PUT /api/admin/categories/{id}
#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<db::categories::Category> {
    if let Some(ref name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Category name must not be empty"));
        }
        // Check duplicate name if changing
        if let Some(existing) = db::categories::find_by_name(&state.pool, name.trim())
            .await
            .map_err(|e| {
                tracing::error!("Category query error: {e}");
                AppError::new(ErrorCode::InternalError)
            })?
            && existing.id != id
        {
            return Err(AppError::new(ErrorCode::CategoryNameExists));
        }
    }

    let category = db::categories::update(
        &state.pool,
        id,
        req.name.map(|n| n.trim().to_string()),
        req.description,
    )
    .await
    .map_err(|e| {
        tracing::error!("Category update error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    Ok(Json(category))
}

/// DELETE /api/admin/categories/{id} — refused while meals reference it
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    let meals = db::categories::meals_count(&state.pool, id).await.map_err(|e| {
        tracing::error!("Category query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    if meals > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasMeals));
    }

    let deleted = db::categories::delete(&state.pool, id).await.map_err(|e| {
        tracing::error!("Category delete error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !deleted {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(json!({ "message": "Category deleted" })))
}

// ── Meals ──

/// GET /api/admin/meals — all meals, including unavailable
pub async fn list_meals(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::meals::MealWithCategory>> {
    let meals = db::meals::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Meals query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(meals))
}

/// POST /api/admin/meals
#[derive(Deserialize)]
pub struct CreateMealRequest {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub max_per_person: Option<i32>,
    pub units_available: Option<i32>,
}

pub async fn create_meal(
    State(state): State<AppState>,
    Json(req): Json<CreateMealRequest>,
) -> ApiResult<db::meals::MealWithCategory> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Meal name must not be empty"));
    }
    if req.price <= Decimal::ZERO {
        return Err(AppError::new(ErrorCode::MealInvalidPrice));
    }
    let max_per_person = req.max_per_person.unwrap_or(1);
    if max_per_person < 1 {
        return Err(AppError::validation("max_per_person must be at least 1"));
    }
    if let Some(units) = req.units_available
        && units < 0
    {
        return Err(AppError::validation("units_available must not be negative"));
    }

    db::categories::find_by_id(&state.pool, req.category_id)
        .await
        .map_err(|e| {
            tracing::error!("Category query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    let meal = db::meals::create(
        &state.pool,
        NewMeal {
            category_id: req.category_id,
            name: name.to_string(),
            description: req.description,
            price: req.price,
            image_url: req.image_url,
            is_available: req.is_available.unwrap_or(true),
            max_per_person,
            units_available: req.units_available,
        },
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Meal create error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(meal_id = meal.id, name = %meal.name, "Meal created");

    let meal = db::meals::find_by_id(&state.pool, meal.id)
        .await
        .map_err(|e| {
            tracing::error!("Meal query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MealNotFound))?;

    Ok(Json(meal))
}

/// GET /api/admin/meals/{id}
pub async fn meal_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<db::meals::MealWithCategory> {
    let meal = db::meals::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Meal query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MealNotFound))?;

    Ok(Json(meal))
}

/// Distinguish an absent field (keep stored value) from an explicit `null`
/// (clear the nullable column).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// PUT /api/admin/meals/{id}
///
/// `image_url` and `units_available` are nullable columns: omitting the field
/// keeps the stored value, an explicit `null` clears it.
#[derive(Deserialize)]
pub struct UpdateMealRequest {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub is_available: Option<bool>,
    pub max_per_person: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub units_available: Option<Option<i32>>,
}

pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMealRequest>,
) -> ApiResult<db::meals::MealWithCategory> {
    if let Some(price) = req.price
        && price <= Decimal::ZERO
    {
        return Err(AppError::new(ErrorCode::MealInvalidPrice));
    }
    if let Some(max) = req.max_per_person
        && max < 1
    {
        return Err(AppError::validation("max_per_person must be at least 1"));
    }
    if let Some(Some(units)) = req.units_available
        && units < 0
    {
        return Err(AppError::validation("units_available must not be negative"));
    }
    if let Some(category_id) = req.category_id {
        db::categories::find_by_id(&state.pool, category_id)
            .await
            .map_err(|e| {
                tracing::error!("Category query error: {e}");
                AppError::new(ErrorCode::InternalError)
            })?
            .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    }

    let updated = db::meals::update(
        &state.pool,
        id,
        MealUpdate {
            category_id: req.category_id,
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            price: req.price,
            image_url: req.image_url,
            is_available: req.is_available,
            max_per_person: req.max_per_person,
            units_available: req.units_available,
        },
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Meal update error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if updated.is_none() {
        return Err(AppError::new(ErrorCode::MealNotFound));
    }

    let meal = db::meals::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Meal query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MealNotFound))?;

    Ok(Json(meal))
}

/// DELETE /api/admin/meals/{id}
///
/// Meals referenced by order history are retired (marked unavailable)
/// instead of deleted, so frozen order lines keep their referent.
pub async fn delete_meal(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    let has_history = db::meals::has_order_items(&state.pool, id).await.map_err(|e| {
        tracing::error!("Meal query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if has_history {
        let retired = db::meals::set_unavailable(&state.pool, id, now_millis())
            .await
            .map_err(|e| {
                tracing::error!("Meal update error: {e}");
                AppError::new(ErrorCode::InternalError)
            })?;
        if !retired {
            return Err(AppError::new(ErrorCode::MealNotFound));
        }

        tracing::info!(meal_id = id, "Meal retired (has order history)");
        return Ok(Json(
            json!({ "message": "Meal has order history and was marked unavailable" }),
        ));
    }

    let deleted = db::meals::delete(&state.pool, id).await.map_err(|e| {
        tracing::error!("Meal delete error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !deleted {
        return Err(AppError::new(ErrorCode::MealNotFound));
    }

    tracing::info!(meal_id = id, "Meal deleted");

    Ok(Json(json!({ "message": "Meal deleted" })))
}
