//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ListingNotFound
            | Self::ProductNotFound
            | Self::VendorNotFound
            | Self::OrderNotFound
            | Self::PaymentNotFound
            | Self::ReviewNotFound
            | Self::ReportNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailExists
            | Self::ListingExists
            | Self::OutOfStock
            | Self::OrderNotPending
            | Self::OrderAlreadyPaid
            | Self::InvalidStatusTransition
            | Self::ReviewExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::VendorRequired
            | Self::AdminRequired
            | Self::VendorNotVerified => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient, client can retry)
            Self::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ListingNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::OutOfStock.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ReviewExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::OrderNotPending.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_payment_verification_is_bad_request() {
        assert_eq!(
            ErrorCode::PaymentVerificationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_errors_are_500() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
