//! Utility module - logging and common type aliases

pub mod logger;
pub mod result;

// Re-export error types from shared
pub use result::AppResult;
pub use shared::error::{ApiResponse, AppError, ErrorCode, ok, ok_with_message};
