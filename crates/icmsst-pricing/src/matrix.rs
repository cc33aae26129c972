//! # Price Matrix
//!
//! Prices for one final cost at five standard margin tiers. Each tier's base
//! price is expanded into four display levels by fixed multipliers.
//!
//! | Level | Multiplier |
//! |-------|------------|
//! | A     | 0.95       |
//! | B     | 1.0        |
//! | C     | 1.111      |
//! | D     | 1.1765     |

use std::collections::BTreeMap;

use icmsst_core::Percent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::current::SimulationInput;

/// Display level of a matrix price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceLevel {
    A,
    B,
    C,
    D,
}

impl PriceLevel {
    pub fn all() -> &'static [PriceLevel] {
        &[Self::A, Self::B, Self::C, Self::D]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Factor applied to the tier's base price.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::A => Decimal::new(95, 2),
            Self::B => Decimal::ONE,
            Self::C => Decimal::new(1111, 3),
            Self::D => Decimal::new(11765, 4),
        }
    }
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Margin tiers as (label, margin percent).
pub const MARGIN_TIERS: [(&str, u32); 5] = [
    ("Agressiva", 8),
    ("Competitiva", 10),
    ("Padrão", 11),
    ("Confortável", 12),
    ("Premium", 15),
];

/// One margin tier of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceMatrixRow {
    pub label: String,
    pub margin: Percent,
    /// Inverted price for this margin; zero when the stack saturates.
    pub base_price: Decimal,
    pub levels: BTreeMap<PriceLevel, Decimal>,
}

/// Build the five-tier matrix for `final_cost`.
///
/// The deduction stack is taken from `input` exactly as
/// [`calculate_costs`](crate::current::calculate_costs) takes it; the
/// input's own target result is ignored in favour of each tier's margin.
pub fn generate_price_matrix(final_cost: Decimal, input: &SimulationInput) -> Vec<PriceMatrixRow> {
    let stack = input.deduction_stack();

    MARGIN_TIERS
        .iter()
        .map(|(label, margin)| {
            let margin = Percent::from(*margin);
            let base_price = stack.price_for_margin(final_cost, margin);
            let levels = PriceLevel::all()
                .iter()
                .map(|level| (*level, base_price * level.multiplier()))
                .collect();
            PriceMatrixRow {
                label: (*label).to_string(),
                margin,
                base_price,
                levels,
            }
        })
        .collect()
}
