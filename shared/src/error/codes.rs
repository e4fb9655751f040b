//! Unified error codes for the marketplace backend
//!
//! Error codes are represented as u16 values for efficient serialization
//! and cross-language compatibility (Rust, TypeScript, etc.)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email already registered
    EmailExists = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Vendor role required
    VendorRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Vendor account is not verified yet
    VendorNotVerified = 2004,

    // ==================== 3xxx: Catalog / Cart ====================
    /// Cart is empty
    CartEmpty = 3001,
    /// Listing not found or no longer available
    ListingNotFound = 3002,
    /// Listing is not active
    ListingInactive = 3003,
    /// Requested quantity exceeds available stock
    OutOfStock = 3004,
    /// Product not found
    ProductNotFound = 3005,
    /// Vendor not found
    VendorNotFound = 3006,
    /// A listing for this product already exists
    ListingExists = 3007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is not in pending state
    OrderNotPending = 4002,
    /// Order has already been paid
    OrderAlreadyPaid = 4003,
    /// Order status transition is not allowed
    InvalidStatusTransition = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment signature verification failed
    PaymentVerificationFailed = 5001,
    /// Payment confirmation does not match the order's payment mode
    PaymentModeMismatch = 5002,
    /// Payment gateway is unavailable
    GatewayUnavailable = 5003,
    /// Payment record not found
    PaymentNotFound = 5004,

    // ==================== 6xxx: Review / Report ====================
    /// A review for this purchase already exists
    ReviewExists = 6001,
    /// No paid order qualifies the caller to review this product
    ReviewNotEligible = 6002,
    /// Review not found
    ReviewNotFound = 6003,
    /// Report not found
    ReportNotFound = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::NotAuthenticated => "Please login first",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::EmailExists => "Email already registered",

            Self::PermissionDenied => "Permission denied",
            Self::VendorRequired => "Vendor account required",
            Self::AdminRequired => "Admin account required",
            Self::VendorNotVerified => "Vendor account is not verified",

            Self::CartEmpty => "Cart is empty",
            Self::ListingNotFound => "Listing not found",
            Self::ListingInactive => "Listing is not active",
            Self::OutOfStock => "Insufficient stock",
            Self::ProductNotFound => "Product not found",
            Self::VendorNotFound => "Vendor not found",
            Self::ListingExists => "Listing for this product already exists",

            Self::OrderNotFound => "Order not found",
            Self::OrderNotPending => "Order is not pending",
            Self::OrderAlreadyPaid => "Order has already been paid",
            Self::InvalidStatusTransition => "Status transition not allowed",

            Self::PaymentVerificationFailed => "Payment verification failed",
            Self::PaymentModeMismatch => "Payment mode mismatch",
            Self::GatewayUnavailable => "Payment gateway unavailable",
            Self::PaymentNotFound => "Payment not found",

            Self::ReviewExists => "Review already exists for this purchase",
            Self::ReviewNotEligible => "No qualifying purchase found",
            Self::ReviewNotFound => "Review not found",
            Self::ReportNotFound => "Report not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            1005 => Ok(Self::EmailExists),

            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::VendorRequired),
            2003 => Ok(Self::AdminRequired),
            2004 => Ok(Self::VendorNotVerified),

            3001 => Ok(Self::CartEmpty),
            3002 => Ok(Self::ListingNotFound),
            3003 => Ok(Self::ListingInactive),
            3004 => Ok(Self::OutOfStock),
            3005 => Ok(Self::ProductNotFound),
            3006 => Ok(Self::VendorNotFound),
            3007 => Ok(Self::ListingExists),

            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::OrderNotPending),
            4003 => Ok(Self::OrderAlreadyPaid),
            4004 => Ok(Self::InvalidStatusTransition),

            5001 => Ok(Self::PaymentVerificationFailed),
            5002 => Ok(Self::PaymentModeMismatch),
            5003 => Ok(Self::GatewayUnavailable),
            5004 => Ok(Self::PaymentNotFound),

            6001 => Ok(Self::ReviewExists),
            6002 => Ok(Self::ReviewNotEligible),
            6003 => Ok(Self::ReviewNotFound),
            6004 => Ok(Self::ReportNotFound),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::ConfigError),

            _ => Err(format!("unknown error code: {}", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_round_trip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::OutOfStock,
            ErrorCode::PaymentVerificationFailed,
            ErrorCode::ReviewExists,
            ErrorCode::DatabaseError,
        ];
        for code in codes {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(ErrorCode::try_from(65535).is_err());
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OutOfStock).unwrap();
        assert_eq!(json, "3004");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::OutOfStock);
    }
}
