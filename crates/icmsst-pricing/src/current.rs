//! # Current-Regime Engine
//!
//! Cost and price under today's ICMS / PIS / COFINS rules.
//!
//! ## Steps
//!
//! 1. Invoice total = purchase + freight/IPI.
//! 2. Entry ICMS credit = purchase × interstate rate, whatever the regime.
//! 3. Under `substituido` the ST base is the invoice total grossed up by the
//!    adjusted MVA; gross ST is that base at the destination internal rate,
//!    and the payable amount is gross ST less the entry credit, floored at
//!    zero. The other regimes carry no ST.
//! 4. PIS/COFINS entry credit on the purchase, optionally after removing the
//!    ICMS credit from its base.
//! 5. Final cost: `substituido` adds the ST payable; the other regimes take
//!    the ICMS credit off instead. Both subtract the PIS/COFINS credit.
//! 6. Break-even and target price come from the shared
//!    [`DeductionStack`](crate::deductions::DeductionStack).
//!
//! The function is total. Nothing is validated and nothing is rounded;
//! callers validate before and round for display after.

use icmsst_core::{NcmCode, Percent, TaxRegime, UfCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deductions::{DeductionRates, DeductionStack};

/// Inputs to [`calculate_costs`]. Every rate is on the 0–100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub purchase_value: Decimal,
    /// Freight and IPI together, as billed on the invoice.
    pub freight_ipi: Decimal,
    /// MVA from the NCM catalog, before adjustment. Informational.
    pub mva_original: Percent,
    /// MVA used for the ST base.
    pub mva_adjusted: Percent,
    pub interstate_rate: Percent,
    pub destination_internal_rate: Percent,
    pub pis_cofins_entry_rate: Percent,
    pub pis_cofins_sale_rate: Percent,
    pub icms_sale_rate: Percent,
    pub commission_rate: Percent,
    pub other_variable_cost_rate: Percent,
    pub fixed_cost_rate: Percent,
    pub target_result_rate: Percent,
    /// Only read under `reduzido`.
    #[serde(default)]
    pub base_reduction_rate: Percent,
    pub regime: TaxRegime,
    pub origin: UfCode,
    pub destination: UfCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncm: Option<NcmCode>,
    /// Remove the entry ICMS credit from the PIS/COFINS credit base.
    #[serde(default)]
    pub exclude_icms_from_pis_base: bool,
}

impl SimulationInput {
    /// Sale-side rates feeding the deduction stack.
    pub fn deduction_rates(&self) -> DeductionRates {
        DeductionRates {
            pis_cofins_sale: self.pis_cofins_sale_rate,
            commission: self.commission_rate,
            icms_sale: self.icms_sale_rate,
            other_variable_costs: self.other_variable_cost_rate,
            fixed_costs: self.fixed_cost_rate,
            base_reduction: self.base_reduction_rate,
        }
    }

    /// Deduction stack for this input's regime.
    pub fn deduction_stack(&self) -> DeductionStack {
        DeductionStack::new(self.regime, &self.deduction_rates())
    }
}

/// Output of [`calculate_costs`]. Monetary fields are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_invoice_value: Decimal,
    pub entry_icms_credit: Decimal,
    pub st_base: Decimal,
    pub gross_st: Decimal,
    pub st_payable: Decimal,
    pub pis_cofins_base: Decimal,
    pub pis_cofins_credit: Decimal,
    pub final_cost: Decimal,
    pub effective_icms_sale_rate: Percent,
    pub deductions_without_margin: Percent,
    pub total_deductions_with_margin: Percent,
    /// Zero when the stack without margin reaches 100%.
    pub break_even_price: Decimal,
    /// Zero when the stack with margin reaches 100%.
    pub target_sale_price: Decimal,
    pub absolute_margin: Decimal,
    pub total_taxes: Decimal,
}

/// Compute cost, taxes and prices under the current regime.
pub fn calculate_costs(input: &SimulationInput) -> SimulationResult {
    let total_invoice_value = input.purchase_value + input.freight_ipi;
    let entry_icms_credit = input.interstate_rate.of(input.purchase_value);

    let (st_base, gross_st, st_payable) = match input.regime {
        TaxRegime::Substituido => {
            let st_base = total_invoice_value * (Decimal::ONE + input.mva_adjusted.fraction());
            let gross_st = input.destination_internal_rate.of(st_base);
            let st_payable = (gross_st - entry_icms_credit).max(Decimal::ZERO);
            (st_base, gross_st, st_payable)
        }
        TaxRegime::Tributado | TaxRegime::Reduzido => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    };

    let pis_cofins_base = if input.exclude_icms_from_pis_base {
        input.purchase_value - entry_icms_credit
    } else {
        input.purchase_value
    };
    let pis_cofins_credit = input.pis_cofins_entry_rate.of(pis_cofins_base);

    let final_cost = match input.regime {
        TaxRegime::Substituido => total_invoice_value + st_payable - pis_cofins_credit,
        TaxRegime::Tributado | TaxRegime::Reduzido => {
            total_invoice_value - entry_icms_credit - pis_cofins_credit
        }
    };

    let stack = input.deduction_stack();
    let total_deductions_with_margin = stack.with_margin(input.target_result_rate);
    let break_even_price = stack.break_even_price(final_cost);
    let target_sale_price = stack.price_for_margin(final_cost, input.target_result_rate);

    let absolute_margin = input.target_result_rate.of(target_sale_price);
    let total_taxes = st_payable
        + stack.effective_icms_sale.of(target_sale_price)
        + input.pis_cofins_sale_rate.of(target_sale_price);

    SimulationResult {
        total_invoice_value,
        entry_icms_credit,
        st_base,
        gross_st,
        st_payable,
        pis_cofins_base,
        pis_cofins_credit,
        final_cost,
        effective_icms_sale_rate: stack.effective_icms_sale,
        deductions_without_margin: stack.without_margin,
        total_deductions_with_margin,
        break_even_price,
        target_sale_price,
        absolute_margin,
        total_taxes,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn percent(max_hundredths: i64) -> impl Strategy<Value = Percent> {
        (0..=max_hundredths).prop_map(|n| Percent::from_parts(n, 2))
    }

    fn money() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    fn regime() -> impl Strategy<Value = TaxRegime> {
        prop::sample::select(TaxRegime::all().to_vec())
    }

    prop_compose! {
        fn sale_rates()(
            pis_cofins_sale in percent(1_500),
            commission in percent(3_000),
            icms_sale in percent(3_000),
            other_variable_costs in percent(3_000),
            fixed_costs in percent(3_000),
            base_reduction in percent(10_000),
        ) -> DeductionRates {
            DeductionRates {
                pis_cofins_sale,
                commission,
                icms_sale,
                other_variable_costs,
                fixed_costs,
                base_reduction,
            }
        }
    }

    prop_compose! {
        fn simulation_input()(
            purchase_value in money(),
            freight_ipi in money(),
            mva in percent(20_000),
            interstate_rate in percent(2_000),
            destination_internal_rate in percent(3_000),
            pis_cofins_entry_rate in percent(1_500),
            target_result_rate in percent(3_000),
            regime in regime(),
            exclude_icms_from_pis_base in any::<bool>(),
            sale in sale_rates(),
        ) -> SimulationInput {
            SimulationInput {
                purchase_value,
                freight_ipi,
                mva_original: mva,
                mva_adjusted: mva,
                interstate_rate,
                destination_internal_rate,
                pis_cofins_entry_rate,
                pis_cofins_sale_rate: sale.pis_cofins_sale,
                icms_sale_rate: sale.icms_sale,
                commission_rate: sale.commission,
                other_variable_cost_rate: sale.other_variable_costs,
                fixed_cost_rate: sale.fixed_costs,
                target_result_rate,
                base_reduction_rate: sale.base_reduction,
                regime,
                origin: UfCode::new("SP").unwrap(),
                destination: UfCode::new("BA").unwrap(),
                ncm: None,
                exclude_icms_from_pis_base,
            }
        }
    }

    proptest! {
        /// Inverting the stack and re-applying it gives back the final cost.
        #[test]
        fn target_price_round_trips(input in simulation_input()) {
            let r = calculate_costs(&input);
            if r.total_deductions_with_margin < Percent::HUNDRED {
                let remaining = (Percent::HUNDRED - r.total_deductions_with_margin).fraction();
                let diff = (r.target_sale_price * remaining - r.final_cost).abs();
                prop_assert!(diff < Decimal::new(1, 8), "diff {}", diff);
            } else {
                prop_assert_eq!(r.target_sale_price, Decimal::ZERO);
            }
        }

        /// Break-even follows the same rule using only the stack without margin.
        #[test]
        fn break_even_independent_of_margin(input in simulation_input()) {
            let r = calculate_costs(&input);
            if r.deductions_without_margin >= Percent::HUNDRED {
                prop_assert_eq!(r.break_even_price, Decimal::ZERO);
            } else {
                let remaining = (Percent::HUNDRED - r.deductions_without_margin).fraction();
                let diff = (r.break_even_price * remaining - r.final_cost).abs();
                prop_assert!(diff < Decimal::new(1, 8));
            }
        }

        /// ST payable is clamped at zero.
        #[test]
        fn st_payable_never_negative(input in simulation_input()) {
            let r = calculate_costs(&input);
            prop_assert!(r.st_payable >= Decimal::ZERO);
            if input.regime != TaxRegime::Substituido {
                prop_assert_eq!(r.st_payable, Decimal::ZERO);
            }
        }

        /// Same input, same output.
        #[test]
        fn deterministic(input in simulation_input()) {
            prop_assert_eq!(calculate_costs(&input), calculate_costs(&input));
        }
    }
}
