//! Error types and API response structures

use super::codes::ErrorCode;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The primary error type at the HTTP boundary, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level errors, context, etc.)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

/// Result type used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> http::StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error with unified message
    /// (prevents email enumeration during login)
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyExists, format!("{} already exists", r))
            .with_detail("resource", r)
    }
}

/// API unified response envelope
///
/// ```json
/// {
///   "code": 0,
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 = success)
    pub code: ErrorCode,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response wrapping `data`
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success,
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
            details: None,
        }
    }
}

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    let mut resp = ApiResponse::success(data);
    resp.message = message.into();
    Json(resp)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // 5xx details stay in the logs, not in the response body
        let (message, details) = match self.code {
            ErrorCode::DatabaseError | ErrorCode::InternalError | ErrorCode::ConfigError => {
                tracing::error!(code = %self.code, error = %self.message, "Internal error occurred");
                (self.code.message().to_string(), None)
            }
            _ => (self.message, self.details),
        };

        let body = Json(ApiResponse::<()> {
            code: self.code,
            message,
            data: None,
            details,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_code() {
        assert_eq!(AppError::validation("bad").code, ErrorCode::ValidationFailed);
        assert_eq!(AppError::not_found("Order").code, ErrorCode::NotFound);
        assert_eq!(
            AppError::invalid_credentials().code,
            ErrorCode::InvalidCredentials
        );
    }

    #[test]
    fn test_default_message_from_code() {
        let err = AppError::new(ErrorCode::OutOfStock);
        assert_eq!(err.message, "Insufficient stock");
    }

    #[test]
    fn test_with_detail_accumulates() {
        let err = AppError::new(ErrorCode::OutOfStock)
            .with_detail("listing", "listing:abc")
            .with_detail("requested", 3);
        let details = err.details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details["requested"], serde_json::json!(3));
    }

    #[test]
    fn test_envelope_serialization() {
        let resp = ApiResponse::success(42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], 42);
    }
}
