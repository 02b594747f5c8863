//! Database access layer
//!
//! Thin per-table modules over the sqlx PostgreSQL pool. Multi-step workflow
//! writes (order creation, payment submission/verification) run inside a
//! single transaction and never commit partially.

pub mod categories;
pub mod departments;
pub mod email_verifications;
pub mod free_meal_days;
pub mod meals;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod stats;
pub mod users;
