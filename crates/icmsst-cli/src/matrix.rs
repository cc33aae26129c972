//! # Matrix Subcommand
//!
//! Price matrix for a final cost that is already known, e.g. taken from an
//! earlier simulation or from the ERP. Sale-side rates come from flags,
//! then the pricing profile, exactly as `simulate` resolves them.

use anyhow::Result;
use clap::Args;
use icmsst_core::{Percent, TaxRegime};
use icmsst_pricing::{generate_price_matrix, PriceMatrixRow, SimulationDraft};
use rust_decimal::Decimal;

use crate::report::render_matrix;
use crate::Context;

/// Arguments for the `icmsst matrix` subcommand.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Final unit cost the prices must cover (BRL).
    #[arg(long)]
    pub final_cost: Decimal,

    #[arg(long, default_value = "substituido")]
    pub regime: TaxRegime,

    /// Destination UF; supplies the default sale ICMS.
    #[arg(long)]
    pub destination: String,

    /// Origin UF. Defaults to the profile's origin, then the destination.
    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub icms_sale: Option<Percent>,

    #[arg(long)]
    pub pis_cofins_sale: Option<Percent>,

    #[arg(long)]
    pub commission: Option<Percent>,

    #[arg(long)]
    pub other_costs: Option<Percent>,

    #[arg(long)]
    pub fixed_costs: Option<Percent>,

    #[arg(long)]
    pub base_reduction: Option<Percent>,

    #[arg(long)]
    pub json: bool,
}

/// Resolve the sale-side rates and build the matrix.
pub fn build_matrix(args: &MatrixArgs, ctx: &Context) -> Result<Vec<PriceMatrixRow>> {
    icmsst_core::error::ensure_amount("final_cost", args.final_cost)?;

    let origin = args
        .origin
        .clone()
        .or_else(|| ctx.profile.default_origin.as_ref().map(|uf| uf.to_string()))
        .unwrap_or_else(|| args.destination.clone());

    // Only sale-side rates matter here; the purchase side stays empty.
    let draft = SimulationDraft {
        origin: Some(origin),
        mva: Some(Percent::ZERO),
        icms_sale_rate: args.icms_sale,
        pis_cofins_sale_rate: args.pis_cofins_sale,
        commission_rate: args.commission,
        other_variable_cost_rate: args.other_costs,
        fixed_cost_rate: args.fixed_costs,
        base_reduction_rate: args.base_reduction,
        ..SimulationDraft::new(Decimal::ZERO, args.regime, args.destination.clone())
    };
    let prepared = ctx.simulator().prepare(&draft)?;
    Ok(generate_price_matrix(args.final_cost, &prepared.input))
}

/// Execute the matrix subcommand.
pub fn run_matrix(args: &MatrixArgs, ctx: &Context) -> Result<u8> {
    let rows = build_matrix(args, ctx)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_matrix(&rows));
    }
    Ok(0)
}
