//! Shared types for the canteen backend
//!
//! Common types used across crates: the unified error system and small
//! utility functions.

pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
