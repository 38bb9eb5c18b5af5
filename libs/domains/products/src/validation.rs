//! Field rules shared by the request extractors and the service.
//!
//! Each rule returns a `validator::ValidationError` so it can be plugged into
//! `#[validate(custom(...))]`; the service collects them per field with
//! [`FieldViolations`].

use std::borrow::Cow;

use axum_helpers::FieldErrors;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::error::ProductError;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const PRICE_MAX_SCALE: u32 = 2;
pub const PRICE_MAX_DIGITS: u32 = 10;

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Non-blank and 3 to 100 characters once trimmed.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(violation("required", "Name is required."));
    }
    let chars = trimmed.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return Err(violation(
            "length",
            "Name must be between 3 and 100 characters.",
        ));
    }
    Ok(())
}

/// At most 500 characters once trimmed; empty is allowed.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(violation(
            "length",
            "Description must be at most 500 characters.",
        ));
    }
    Ok(())
}

/// Strictly positive, at most 2 decimal places and 10 digits in total.
/// Trailing zeros do not count (`9.9900` is fine).
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(violation("range", "Price must be greater than zero."));
    }
    let normalized = price.normalize();
    if normalized.scale() > PRICE_MAX_SCALE || total_digits(&normalized) > PRICE_MAX_DIGITS {
        return Err(violation(
            "precision",
            "Price must have at most 2 decimal places and 10 digits in total.",
        ));
    }
    Ok(())
}

// Digits of the integer part plus the fractional digits.
fn total_digits(value: &Decimal) -> u32 {
    let mantissa = value.mantissa().unsigned_abs();
    let digits = if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    };
    digits.max(value.scale())
}

pub fn validate_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        return Err(violation("range", "Stock cannot be negative."));
    }
    Ok(())
}

pub fn validate_id(id: i32) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(violation("range", "Id must be greater than zero."));
    }
    Ok(())
}

/// Collects rule failures per field so one failure can name every field.
#[derive(Debug, Default)]
pub struct FieldViolations(FieldErrors);

impl FieldViolations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), ValidationError>) -> &mut Self {
        if let Err(e) = result {
            let message = e
                .message
                .map(|m| m.into_owned())
                .unwrap_or_else(|| e.code.into_owned());
            self.0.entry(field.to_string()).or_default().push(message);
        }
        self
    }

    /// `Ok` when every check passed, otherwise one `Validation` failure.
    pub fn finish(&mut self) -> Result<(), ProductError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ProductError::Validation(std::mem::take(&mut self.0)))
        }
    }
}
