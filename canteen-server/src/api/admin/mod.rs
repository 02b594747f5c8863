//! Kitchen-admin API endpoints — split into sub-modules by domain

mod catalog;
mod dashboard;
mod departments;
mod free_meal_days;
mod notifications;
mod orders;
mod payments;

use axum::Router;
use axum::routing::{get, put};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/api/admin/departments/{id}",
            get(departments::detail)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route(
            "/api/admin/free-meal-days",
            get(free_meal_days::list).post(free_meal_days::create),
        )
        .route(
            "/api/admin/free-meal-days/{id}",
            put(free_meal_days::update).delete(free_meal_days::delete),
        )
        .route(
            "/api/admin/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(catalog::category_detail)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/api/admin/meals",
            get(catalog::list_meals).post(catalog::create_meal),
        )
        .route(
            "/api/admin/meals/{id}",
            get(catalog::meal_detail)
                .put(catalog::update_meal)
                .delete(catalog::delete_meal),
        )
        .route("/api/admin/orders", get(orders::list).post(orders::create))
        .route("/api/admin/orders/date-range", get(orders::date_range))
        .route(
            "/api/admin/orders/{id}",
            get(orders::detail).put(orders::update),
        )
        .route("/api/admin/payments", get(payments::list))
        .route(
            "/api/admin/payments/{id}",
            get(payments::detail).put(payments::update),
        )
        .route("/api/admin/notifications", get(notifications::list))
        .route(
            "/api/admin/notifications/{id}/read",
            put(notifications::mark_read),
        )
        .route("/api/admin/dashboard", get(dashboard::stats))
}
