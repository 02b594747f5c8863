//! Department management

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;

/// GET /api/admin/departments — all departments, including deactivated
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Vec<db::departments::DepartmentWithCount>> {
    let departments = db::departments::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Departments query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(departments))
}

/// POST /api/admin/departments
#[derive(Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CreateDepartmentRequest>,
) -> ApiResult<db::departments::Department> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Department name must not be empty"));
    }

    let department = db::departments::create(
        &state.pool,
        name,
        &req.description,
        &identity.user_id,
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Department create error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::DepartmentNameExists))?;

    tracing::info!(department_id = department.id, name = %department.name, "Department created");

    Ok(Json(department))
}

/// GET /api/admin/departments/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<db::departments::Department> {
    let department = db::departments::find_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Department query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;

    Ok(Json(department))
}

/// PUT /api/admin/departments/{id}
#[derive(Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> ApiResult<db::departments::Department> {
    if let Some(ref name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Department name must not be empty"));
        }
        // Check duplicate name if changing
        if let Some(existing) = db::departments::find_by_name(&state.pool, name.trim())
            .await
            .map_err(|e| {
                tracing::error!("Department query error: {e}");
                AppError::new(ErrorCode::InternalError)
            })?
            && existing.id != id
        {
            return Err(AppError::new(ErrorCode::DepartmentNameExists));
        }
    }

    let department = db::departments::update(
        &state.pool,
        id,
        req.name.map(|n| n.trim().to_string()),
        req.description,
        req.is_active,
    )
    .await
    .map_err(|e| {
        tracing::error!("Department update error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;

    Ok(Json(department))
}

/// DELETE /api/admin/departments/{id} — deactivates, never removes
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    let deactivated = db::departments::deactivate(&state.pool, id).await.map_err(|e| {
        tracing::error!("Department deactivate error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !deactivated {
        return Err(AppError::new(ErrorCode::DepartmentNotFound));
    }

    tracing::info!(department_id = id, "Department deactivated");

    Ok(Json(json!({ "message": "Department deactivated" })))
}
