//! # Error Types
//!
//! Validation errors raised by the domain newtype constructors and by the
//! caller-side checks that run before a simulation reaches the pricing core.
//! The core calculations themselves are total and never return these.

use rust_decimal::Decimal;
use thiserror::Error;

/// Input validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// State code is not two ASCII letters.
    #[error("invalid UF code: \"{0}\" (expected two letters, e.g. SP)")]
    InvalidUf(String),

    /// NCM code is not 8 digits.
    #[error("invalid NCM code: \"{0}\" (expected 8 digits, optionally as XXXX.XX.XX)")]
    InvalidNcm(String),

    /// CEST code is not 7 digits.
    #[error("invalid CEST code: \"{0}\" (expected 7 digits, optionally as XX.XXX.XX)")]
    InvalidCest(String),

    /// Regime name is not one of the supported regimes.
    #[error("invalid tax regime: \"{0}\" (expected substituido, tributado or reduzido)")]
    InvalidRegime(String),

    /// A monetary field holds a negative value.
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A monetary field exceeds [`MAX_AMOUNT`].
    #[error("{field} must not exceed {max} (got {value})")]
    AmountTooLarge {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
        /// The bound it crossed.
        max: Decimal,
    },

    /// A markup (MVA) exceeds [`Percent::MAX_MARKUP`](crate::Percent::MAX_MARKUP).
    #[error("{field} must not exceed {max}% (got {value})")]
    MarkupTooLarge {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
        /// The bound it crossed.
        max: Decimal,
    },

    /// A percent field lies outside the 0–100 scale.
    #[error("{field} must be between 0 and 100 (got {value})")]
    PercentOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },
}

/// Largest monetary input accepted by the validators (R$ 1 quadrillion).
///
/// Keeps every intermediate value of the pricing engines representable.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Reject a negative monetary value.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

/// Reject a monetary value that is negative or above [`MAX_AMOUNT`].
pub fn ensure_amount(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    ensure_non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            field,
            value,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}
