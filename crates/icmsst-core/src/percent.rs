//! # Percent Values
//!
//! Every rate in a simulation is a percentage on the 0–100 scale: `18` means
//! eighteen percent of the value it modifies. [`Percent`] keeps that scale in
//! the type and exposes exactly one conversion, [`Percent::fraction`], so a
//! rate can never be fed into arithmetic without the division by 100.

use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A percentage on the 0–100 scale.
///
/// Serializes transparently as the underlying decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);

    /// Largest markup accepted for an MVA: 1,000,000%, a price 10,001 times
    /// the invoice.
    pub const MAX_MARKUP: Percent = Percent(Decimal::from_parts(1_000_000, 0, 0, false, 0));

    /// Wrap a decimal already expressed on the 0–100 scale.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build a percent from an integer mantissa and scale, e.g.
    /// `Percent::from_parts(205, 1)` is 20.5%.
    pub fn from_parts(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    /// The percent value itself (`18` for 18%).
    pub fn value(self) -> Decimal {
        self.0
    }

    /// The value as a fraction (`0.18` for 18%).
    pub fn fraction(self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Build a percent from a fraction (`0.18` becomes 18%).
    pub fn from_fraction(fraction: Decimal) -> Self {
        Self(fraction * Decimal::ONE_HUNDRED)
    }

    /// Apply this rate to a base amount.
    pub fn of(self, base: Decimal) -> Decimal {
        base * self.fraction()
    }

    /// Whether the value is exactly zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Check that the value lies within 0–100 inclusive.
    pub fn ensure_in_range(self, field: &'static str) -> Result<(), ValidationError> {
        if self.0 < Decimal::ZERO || self.0 > Decimal::ONE_HUNDRED {
            return Err(ValidationError::PercentOutOfRange {
                field,
                value: self.0,
            });
        }
        Ok(())
    }

    /// Check a markup: not negative and at most [`Percent::MAX_MARKUP`].
    /// Markups may exceed 100.
    pub fn ensure_markup(self, field: &'static str) -> Result<(), ValidationError> {
        crate::error::ensure_non_negative(field, self.0)?;
        if self > Self::MAX_MARKUP {
            return Err(ValidationError::MarkupTooLarge {
                field,
                value: self.0,
                max: Self::MAX_MARKUP.0,
            });
        }
        Ok(())
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u32> for Percent {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Percent {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        Decimal::from_str(&trimmed.replace(',', ".")).map(Self)
    }
}

impl Add for Percent {
    type Output = Percent;

    fn add(self, rhs: Percent) -> Percent {
        Percent(self.0 + rhs.0)
    }
}

impl Sub for Percent {
    type Output = Percent;

    fn sub(self, rhs: Percent) -> Percent {
        Percent(self.0 - rhs.0)
    }
}

impl Sum for Percent {
    fn sum<I: Iterator<Item = Percent>>(iter: I) -> Self {
        iter.fold(Percent::ZERO, Add::add)
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
