//! # Simulate Subcommand
//!
//! Current-regime simulation. Flags map one-to-one onto a
//! [`SimulationDraft`]; anything left out is resolved from the reference
//! pack or the pricing profile. `--invoice` merges fields read off a
//! purchase invoice (JSON, as produced by an extraction service) before
//! explicit flags are applied.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Args;
use icmsst_core::{Percent, TaxRegime};
use icmsst_pricing::{InvoiceExtraction, SimulationDraft};
use rust_decimal::Decimal;

use crate::report::render_simulation;
use crate::Context;

/// Arguments for the `icmsst simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Purchase value of the goods (BRL).
    #[arg(long)]
    pub purchase: Option<Decimal>,

    /// Freight plus IPI on the purchase (BRL).
    #[arg(long)]
    pub freight_ipi: Option<Decimal>,

    /// Tax regime: substituido, tributado or reduzido.
    #[arg(long, default_value = "substituido")]
    pub regime: TaxRegime,

    /// Origin UF. Defaults to the profile's `default_origin`.
    #[arg(long)]
    pub origin: Option<String>,

    /// Destination UF.
    #[arg(long)]
    pub destination: String,

    /// NCM code; supplies the original MVA when `--mva` is absent.
    #[arg(long)]
    pub ncm: Option<String>,

    /// Original MVA (%).
    #[arg(long)]
    pub mva: Option<Percent>,

    /// Interstate ICMS rate (%), overriding the resolved one.
    #[arg(long)]
    pub interstate: Option<Percent>,

    /// Destination internal ICMS rate (%).
    #[arg(long)]
    pub destination_internal: Option<Percent>,

    /// ICMS rate on the sale (%).
    #[arg(long)]
    pub icms_sale: Option<Percent>,

    #[arg(long)]
    pub pis_cofins_entry: Option<Percent>,

    #[arg(long)]
    pub pis_cofins_sale: Option<Percent>,

    #[arg(long)]
    pub commission: Option<Percent>,

    #[arg(long)]
    pub other_costs: Option<Percent>,

    #[arg(long)]
    pub fixed_costs: Option<Percent>,

    /// Target net result (%).
    #[arg(long)]
    pub target: Option<Percent>,

    /// Base reduction applied to sale ICMS under `reduzido` (%).
    #[arg(long)]
    pub base_reduction: Option<Percent>,

    /// Exclude ICMS from the PIS/COFINS credit base (`true` or `false`),
    /// overriding the profile.
    #[arg(long, value_name = "BOOL")]
    pub exclude_icms_from_pis_base: Option<bool>,

    /// Invoice extraction JSON to merge into the draft.
    #[arg(long, value_name = "JSON")]
    pub invoice: Option<PathBuf>,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Append the price matrix to the text report.
    #[arg(long)]
    pub matrix: bool,
}

impl SimulateArgs {
    /// Build the draft: invoice fields first, then explicit flags on top.
    ///
    /// Fails when neither `--purchase` nor the invoice supplies a purchase
    /// value.
    pub fn draft(&self) -> Result<SimulationDraft> {
        let mut draft = SimulationDraft::new(Decimal::ZERO, self.regime, self.destination.clone());
        let mut has_purchase = false;

        if let Some(path) = &self.invoice {
            let invoice = read_invoice(path)?;
            if invoice.is_empty() {
                tracing::warn!(path = %path.display(), "invoice extraction carried no usable fields");
            }
            has_purchase = invoice.purchase_value.is_some();
            invoice.apply_to(&mut draft);
        }
        if let Some(purchase) = self.purchase {
            draft.purchase_value = purchase;
            has_purchase = true;
        }
        if !has_purchase {
            bail!("no purchase value: pass --purchase or an --invoice carrying purchase_value");
        }
        if let Some(freight_ipi) = self.freight_ipi {
            draft.freight_ipi = freight_ipi;
        }

        draft.origin = self.origin.clone();
        draft.ncm = self.ncm.clone();
        draft.mva = self.mva.or(draft.mva);
        draft.interstate_rate = self.interstate.or(draft.interstate_rate);
        draft.destination_internal_rate = self.destination_internal;
        draft.icms_sale_rate = self.icms_sale;
        draft.pis_cofins_entry_rate = self.pis_cofins_entry;
        draft.pis_cofins_sale_rate = self.pis_cofins_sale;
        draft.commission_rate = self.commission;
        draft.other_variable_cost_rate = self.other_costs;
        draft.fixed_cost_rate = self.fixed_costs;
        draft.target_result_rate = self.target;
        draft.base_reduction_rate = self.base_reduction;
        draft.exclude_icms_from_pis_base = self.exclude_icms_from_pis_base;
        Ok(draft)
    }
}

fn read_invoice(path: &std::path::Path) -> Result<InvoiceExtraction> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read invoice extraction: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse invoice extraction: {}", path.display()))
}

/// Execute the simulate subcommand and render its output.
pub fn simulate_output(args: &SimulateArgs, ctx: &Context) -> Result<String> {
    let draft = args.draft()?;
    let report = ctx.simulator().run(&draft)?;
    for notice in &report.notices {
        tracing::info!(%notice, "rate notice");
    }
    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(render_simulation(&report, args.matrix))
    }
}

/// Execute the simulate subcommand.
///
/// Returns exit code 0 on success; errors propagate to `main`.
pub fn run_simulate(args: &SimulateArgs, ctx: &Context) -> Result<u8> {
    println!("{}", simulate_output(args, ctx)?);
    Ok(0)
}
