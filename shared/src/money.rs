//! Money arithmetic over integer minor units
//!
//! All amounts are stored and transmitted as integer minor units (cents).
//! Any arithmetic that can produce fractions (commission rates) is done in
//! [`Decimal`] and rounded back to whole cents with a single, documented
//! rounding mode: half-up ([`RoundingStrategy::MidpointAwayFromZero`]).

use crate::error::{AppError, AppResult};
use rust_decimal::prelude::*;

/// Maximum allowed amount per line or payment (1,000,000.00 in minor units)
pub const MAX_AMOUNT: i64 = 100_000_000;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Convert minor units to a `Decimal`
#[inline]
pub fn to_decimal(minor: i64) -> Decimal {
    Decimal::from(minor)
}

/// Round a decimal amount of minor units to whole cents, half-up
#[inline]
pub fn round_minor(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Multiply an amount in minor units by a rate, rounding half-up to the cent
#[inline]
pub fn apply_rate(minor: i64, rate: Decimal) -> i64 {
    round_minor(to_decimal(minor) * rate)
}

/// Validate an amount in minor units (price, payment)
pub fn validate_amount(minor: i64, field: &str) -> AppResult<()> {
    if minor < 0 {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got {}",
            field, minor
        )));
    }
    if minor > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field, MAX_AMOUNT, minor
        )));
    }
    Ok(())
}

/// Validate a line quantity
pub fn validate_quantity(quantity: i64) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_application_is_exact() {
        // 1% of 200 cents is exactly 2 cents
        let rate = Decimal::new(1, 2); // 0.01
        assert_eq!(apply_rate(200, rate), 2);
    }

    #[test]
    fn test_rounding_is_half_up() {
        let rate = Decimal::new(1, 2);
        // 1% of 150 cents = 1.5 cents -> rounds up to 2
        assert_eq!(apply_rate(150, rate), 2);
        // 1% of 149 cents = 1.49 cents -> rounds down to 1
        assert_eq!(apply_rate(149, rate), 1);
        // 1% of 50 cents = 0.5 cents -> rounds up to 1
        assert_eq!(apply_rate(50, rate), 1);
    }

    #[test]
    fn test_no_float_drift_on_accumulation() {
        // Sum one cent a thousand times through Decimal
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(1);
        }
        assert_eq!(round_minor(total), 1000);
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert!(validate_amount(0, "price").is_ok());
        assert!(validate_amount(MAX_AMOUNT, "price").is_ok());
        assert!(validate_amount(-1, "price").is_err());
        assert!(validate_amount(MAX_AMOUNT + 1, "price").is_err());
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
