//! Shared types for the marketplace backend
//!
//! Common types used across crates: error codes, the application error type,
//! the unified API response envelope, and the user role model.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::Role;
