//! Shared types for the Bazaar marketplace backend.
//!
//! This crate holds everything that is not tied to a single service layer:
//!
//! - **`error`**: unified error codes, [`AppError`] and the API response
//!   envelope used by every HTTP handler
//! - **`money`**: decimal arithmetic over integer minor units
//! - **`types`**: pagination and other small wire types

pub mod error;
pub mod money;
pub mod types;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use types::{Page, PageQuery};
