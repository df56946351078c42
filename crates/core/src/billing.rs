//! Financial validation rules for change orders.
//!
//! Price correctness is a core invariant, not just a request-schema check:
//! these functions are the single authority on what a billable amount may
//! look like, and the API layer must call them before any eligibility work.

use rust_decimal::Decimal;

/// Largest accepted change-order price in USD.
pub const MAX_PRICE_USD: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Largest accepted schedule extension in days.
pub const MAX_EXTRA_DAYS: i32 = 365;

/// Validate a change-order price: strictly positive, at most two fractional
/// digits, and no more than [`MAX_PRICE_USD`].
pub fn validate_price_usd(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() || price.is_zero() {
        return Err("priceUsd must be positive".to_string());
    }
    if price > MAX_PRICE_USD {
        return Err(format!("priceUsd must be at most {MAX_PRICE_USD}"));
    }
    // normalize() strips trailing zeros so 300.00 (scale 2) and 300.000
    // (scale 3) both count as two-or-fewer fractional digits.
    if price.normalize().scale() > 2 {
        return Err("priceUsd must have at most 2 decimal places".to_string());
    }
    Ok(())
}

/// Validate an optional schedule extension: positive, at most
/// [`MAX_EXTRA_DAYS`].
pub fn validate_extra_days(extra_days: i32) -> Result<(), String> {
    if extra_days <= 0 {
        return Err("extraDays must be positive".to_string());
    }
    if extra_days > MAX_EXTRA_DAYS {
        return Err(format!("extraDays must be at most {MAX_EXTRA_DAYS}"));
    }
    Ok(())
}
