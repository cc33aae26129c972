//! # Deduction Stack
//!
//! Sale-side costs in Brazilian retail pricing are quoted as a percentage of
//! the sale price itself, not of cost. Solving for a price that leaves a
//! given cost after those deductions is therefore an inversion:
//!
//! ```text
//! price = cost / ((100 - deductions) / 100)
//! ```
//!
//! The stack is built once here and used by the current-regime engine, the
//! reform engine and the price matrix, so the regime rules for the sale-side
//! ICMS rate exist in exactly one place.

use icmsst_core::{Percent, TaxRegime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rates that make up the stack, each a percent of the sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionRates {
    pub pis_cofins_sale: Percent,
    pub commission: Percent,
    /// Nominal sale-side ICMS rate, before any base reduction.
    pub icms_sale: Percent,
    pub other_variable_costs: Percent,
    pub fixed_costs: Percent,
    /// Base reduction applied to the sale-side ICMS under `reduzido`.
    pub base_reduction: Percent,
}

/// Resolved deduction stack for one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionStack {
    /// Sale-side ICMS rate after the regime's base reduction.
    pub effective_icms_sale: Percent,
    /// Sum of every deduction except the target result.
    pub without_margin: Percent,
}

impl DeductionStack {
    /// Build the stack for a regime.
    ///
    /// Under `reduzido` the sale-side ICMS is scaled by
    /// `(1 - base_reduction / 100)`; the other regimes use it unchanged.
    pub fn new(regime: TaxRegime, rates: &DeductionRates) -> Self {
        let effective_icms_sale = match regime {
            TaxRegime::Reduzido => Percent::new(
                rates.icms_sale.value() * (Decimal::ONE - rates.base_reduction.fraction()),
            ),
            TaxRegime::Substituido | TaxRegime::Tributado => rates.icms_sale,
        };

        let without_margin = rates.pis_cofins_sale
            + rates.commission
            + effective_icms_sale
            + rates.other_variable_costs
            + rates.fixed_costs;

        Self {
            effective_icms_sale,
            without_margin,
        }
    }

    /// Stack without regime-specific ICMS, for engines that replace ICMS
    /// with another tax already summed into `without_margin`.
    pub fn flat(without_margin: Percent) -> Self {
        Self {
            effective_icms_sale: Percent::ZERO,
            without_margin,
        }
    }

    /// Total deductions once a target margin is added.
    pub fn with_margin(&self, margin: Percent) -> Percent {
        self.without_margin + margin
    }

    /// Price that covers `cost`, every deduction and `margin`.
    pub fn price_for_margin(&self, cost: Decimal, margin: Percent) -> Decimal {
        invert_price(cost, self.with_margin(margin))
    }

    /// Price that covers `cost` and every deduction with zero result.
    pub fn break_even_price(&self, cost: Decimal) -> Decimal {
        invert_price(cost, self.without_margin)
    }
}

/// Largest price the engines report (10^24). A stack so close to 100% that
/// the inverted price would pass this is treated like a saturated one.
pub const MAX_PRICE: Decimal = Decimal::from_parts(2_701_131_776, 466_537_709, 54_210, false, 0);

/// Solve `price * (100 - deductions) / 100 = cost` for price.
///
/// Returns zero when deductions reach or exceed 100%: no finite positive
/// price exists there. The same holds when the remaining share is so small
/// that the price is not representable or exceeds [`MAX_PRICE`].
pub fn invert_price(cost: Decimal, deductions: Percent) -> Decimal {
    if deductions >= Percent::HUNDRED {
        return Decimal::ZERO;
    }
    match cost.checked_div((Percent::HUNDRED - deductions).fraction()) {
        Some(price) if price.abs() <= MAX_PRICE => price,
        _ => Decimal::ZERO,
    }
}
