//! Authentication: JWT identity and per-route rate limiting

pub mod rate_limit;
pub mod user_auth;

pub use user_auth::{UserIdentity, admin_middleware, auth_middleware, create_token};
