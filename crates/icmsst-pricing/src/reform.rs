//! # 2027 Reform Engine
//!
//! Projection under the dual VAT that replaces ICMS, PIS and COFINS: a
//! federal CBS and a subnational IBS, summed into one flat IVA rate.
//!
//! The entry credit is the IVA rate applied to purchase plus freight, but
//! only [`CREDIT_RECOGNITION`] percent of it offsets cost. The deduction
//! stack replaces sale-side ICMS and PIS/COFINS with the IVA rate and uses
//! the same price inversion as the current regime.
//!
//! Unlike [`calculate_costs`](crate::current::calculate_costs), every
//! monetary step here is rounded to cents before the next one reads it.

use icmsst_core::{round_money, NcmCode, Percent, UfCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deductions::DeductionStack;

/// CBS (federal) rate.
pub const CBS_RATE: Percent = Percent::new(Decimal::from_parts(88, 0, 0, false, 1));

/// IBS (state and municipal) rate.
pub const IBS_RATE: Percent = Percent::new(Decimal::from_parts(177, 0, 0, false, 1));

/// Share of the entry IVA credit that offsets cost.
pub const CREDIT_RECOGNITION: Percent = Percent::new(Decimal::from_parts(90, 0, 0, false, 0));

/// Reform rates, passed explicitly into every reform calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReformRates {
    pub cbs: Percent,
    pub ibs: Percent,
    pub credit_recognition: Percent,
}

impl Default for ReformRates {
    fn default() -> Self {
        Self {
            cbs: CBS_RATE,
            ibs: IBS_RATE,
            credit_recognition: CREDIT_RECOGNITION,
        }
    }
}

impl ReformRates {
    /// CBS + IBS.
    pub fn total_iva(&self) -> Percent {
        self.cbs + self.ibs
    }
}

/// Inputs to [`calculate_costs_2027`].
///
/// Freight and IPI arrive separately here: IPI is a rate on the purchase,
/// and only purchase plus freight earns IVA credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformInput {
    pub purchase_value: Decimal,
    #[serde(default)]
    pub freight_value: Decimal,
    #[serde(default)]
    pub ipi_rate: Percent,
    pub commission_rate: Percent,
    pub other_variable_cost_rate: Percent,
    pub fixed_cost_rate: Percent,
    pub target_result_rate: Percent,
    pub origin: UfCode,
    pub destination: UfCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncm: Option<NcmCode>,
}

/// Output of [`calculate_costs_2027`]. Monetary fields are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformResult {
    pub cbs_rate: Percent,
    pub ibs_rate: Percent,
    pub total_iva_rate: Percent,
    pub ipi_value: Decimal,
    pub total_invoice_value: Decimal,
    /// Full IVA credit on purchase plus freight.
    pub iva_credit: Decimal,
    /// Part of the credit that offsets cost.
    pub recognized_iva_credit: Decimal,
    pub final_cost: Decimal,
    pub deductions_without_margin: Percent,
    pub total_deductions_with_margin: Percent,
    pub break_even_price: Decimal,
    pub target_sale_price: Decimal,
    pub absolute_margin: Decimal,
    pub cbs_amount: Decimal,
    pub ibs_amount: Decimal,
    /// CBS + IBS on the target price.
    pub iva_debit: Decimal,
    /// Debit less recognized credit, floored at zero.
    pub iva_payable: Decimal,
    pub total_taxes: Decimal,
}

/// Compute cost and prices under the 2027 dual-VAT model.
pub fn calculate_costs_2027(input: &ReformInput, rates: &ReformRates) -> ReformResult {
    let total_iva_rate = rates.total_iva();

    let ipi_value = round_money(input.ipi_rate.of(input.purchase_value));
    let total_invoice_value = round_money(input.purchase_value + input.freight_value + ipi_value);

    let iva_credit = round_money(total_iva_rate.of(input.purchase_value + input.freight_value));
    let recognized_iva_credit = round_money(rates.credit_recognition.of(iva_credit));
    let final_cost = round_money(total_invoice_value - recognized_iva_credit);

    let stack = DeductionStack::flat(
        total_iva_rate + input.commission_rate + input.other_variable_cost_rate + input.fixed_cost_rate,
    );
    let total_deductions_with_margin = stack.with_margin(input.target_result_rate);
    let break_even_price = round_money(stack.break_even_price(final_cost));
    let target_sale_price =
        round_money(stack.price_for_margin(final_cost, input.target_result_rate));
    let absolute_margin = round_money(input.target_result_rate.of(target_sale_price));

    let cbs_amount = round_money(rates.cbs.of(target_sale_price));
    let ibs_amount = round_money(rates.ibs.of(target_sale_price));
    let iva_debit = cbs_amount + ibs_amount;
    let iva_payable = (iva_debit - recognized_iva_credit).max(Decimal::ZERO);

    ReformResult {
        cbs_rate: rates.cbs,
        ibs_rate: rates.ibs,
        total_iva_rate,
        ipi_value,
        total_invoice_value,
        iva_credit,
        recognized_iva_credit,
        final_cost,
        deductions_without_margin: stack.without_margin,
        total_deductions_with_margin,
        break_even_price,
        target_sale_price,
        absolute_margin,
        cbs_amount,
        ibs_amount,
        iva_debit,
        iva_payable,
        total_taxes: iva_debit,
    }
}
