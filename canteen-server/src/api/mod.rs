//! API routes

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod departments;
pub mod health;
pub mod orders;
pub mod payments;
pub mod profile;
pub mod register;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::error::AppError;

use crate::auth::rate_limit;
use crate::auth::user_auth;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public registration (rate limited)
    let register_routes = Router::new()
        .route("/api/auth/register", post(register::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::register_rate_limit,
        ));

    // Public login (rate limited)
    let login_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::login_rate_limit,
        ));

    // Public OTP verification / password reset (rate limited)
    let otp_routes = Router::new()
        .route("/api/auth/verify-email", post(register::verify_email))
        .route("/api/auth/resend-code", post(register::resend_code))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::otp_rate_limit,
        ));

    // Employee routes (JWT authenticated)
    let employee = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/departments", get(departments::list))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/meals", get(catalog::list_meals))
        .route("/api/meals/{id}", get(catalog::get_meal))
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/{id}", get(orders::detail))
        .route("/api/free-meal-today", get(orders::free_meal_today))
        .route("/api/payments", post(payments::submit))
        .route("/api/payments/{id}", get(payments::detail))
        .route("/api/dashboard", get(dashboard::customer_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth::auth_middleware,
        ));

    // Kitchen-admin routes (JWT + admin role; auth runs first, then the role check)
    let admin = admin::router()
        .layer(middleware::from_fn(user_auth::admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(register_routes)
        .merge(login_routes)
        .merge(otp_routes)
        .merge(employee)
        .merge(admin)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
