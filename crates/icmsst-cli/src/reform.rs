//! # Reform Subcommand
//!
//! Projects a purchase into the 2027 dual-VAT scenario (CBS + IBS) using
//! the reform rates from the pricing profile.

use anyhow::Result;
use clap::Args;
use icmsst_core::Percent;
use icmsst_pricing::ReformDraft;
use rust_decimal::Decimal;

use crate::report::render_reform;
use crate::Context;

/// Arguments for the `icmsst reform` subcommand.
#[derive(Args, Debug)]
pub struct ReformArgs {
    /// Purchase value of the goods (BRL).
    #[arg(long)]
    pub purchase: Decimal,

    /// Freight on the purchase (BRL).
    #[arg(long, default_value = "0")]
    pub freight: Decimal,

    /// IPI rate on goods plus freight (%).
    #[arg(long)]
    pub ipi: Option<Percent>,

    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub destination: String,

    #[arg(long)]
    pub ncm: Option<String>,

    #[arg(long)]
    pub commission: Option<Percent>,

    #[arg(long)]
    pub other_costs: Option<Percent>,

    #[arg(long)]
    pub fixed_costs: Option<Percent>,

    #[arg(long)]
    pub target: Option<Percent>,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReformArgs {
    pub fn draft(&self) -> ReformDraft {
        ReformDraft {
            freight_value: self.freight,
            ipi_rate: self.ipi,
            origin: self.origin.clone(),
            ncm: self.ncm.clone(),
            commission_rate: self.commission,
            other_variable_cost_rate: self.other_costs,
            fixed_cost_rate: self.fixed_costs,
            target_result_rate: self.target,
            ..ReformDraft::new(self.purchase, self.destination.clone())
        }
    }
}

pub fn reform_output(args: &ReformArgs, ctx: &Context) -> Result<String> {
    let report = ctx.simulator().run_reform(&args.draft())?;
    tracing::debug!(
        final_cost = %report.result.final_cost,
        iva_payable = %report.result.iva_payable,
        "reform projection computed"
    );
    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(render_reform(&report))
    }
}

/// Execute the reform subcommand.
pub fn run_reform(args: &ReformArgs, ctx: &Context) -> Result<u8> {
    println!("{}", reform_output(args, ctx)?);
    Ok(0)
}
