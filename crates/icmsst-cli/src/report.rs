//! # Text Reports
//!
//! Human-readable renderings of engine output. Money is shown as
//! `R$ 1.234,56` and rates as `18,00%`; rounding happens only here.

use icmsst_core::{format_brl, format_percent, Percent};
use icmsst_pack::{NcmEntry, UfEntry};
use icmsst_pricing::{
    InterstateResolution, PriceLevel, PriceMatrixRow, ReformReport, SimulationReport,
};
use rust_decimal::Decimal;

fn line(out: &mut String, label: &str, value: impl AsRef<str>) {
    out.push_str(&format!("  {label:<30}{}\n", value.as_ref()));
}

fn pct(p: Percent) -> String {
    format_percent(p.value())
}

/// Current-regime report, optionally followed by the matrix.
pub fn render_simulation(report: &SimulationReport, with_matrix: bool) -> String {
    let input = &report.input;
    let r = &report.result;
    let mut out = String::new();

    let ncm = input
        .ncm
        .as_ref()
        .map(|c| format!("  NCM {}", c.dotted()))
        .unwrap_or_default();
    out.push_str(&format!(
        "Simulation ({}) {} -> {}{ncm}\n",
        input.regime, input.origin, input.destination
    ));

    out.push_str("Rates\n");
    line(&mut out, "Interstate ICMS", pct(input.interstate_rate));
    line(&mut out, "Destination internal ICMS", pct(input.destination_internal_rate));
    line(&mut out, "MVA original", pct(input.mva_original));
    line(&mut out, "MVA adjusted", pct(input.mva_adjusted));

    out.push_str("Cost\n");
    line(&mut out, "Invoice total", format_brl(r.total_invoice_value));
    line(&mut out, "Entry ICMS credit", format_brl(r.entry_icms_credit));
    if input.regime.has_substitution() {
        line(&mut out, "ST base", format_brl(r.st_base));
        line(&mut out, "Gross ST", format_brl(r.gross_st));
        line(&mut out, "ST payable", format_brl(r.st_payable));
    }
    line(&mut out, "PIS/COFINS credit", format_brl(r.pis_cofins_credit));
    line(&mut out, "Final cost", format_brl(r.final_cost));

    out.push_str("Price\n");
    line(&mut out, "Effective sale ICMS", pct(r.effective_icms_sale_rate));
    line(&mut out, "Deductions", pct(r.deductions_without_margin));
    line(&mut out, "Deductions with margin", pct(r.total_deductions_with_margin));
    line(&mut out, "Break-even price", format_brl(r.break_even_price));
    line(&mut out, "Target sale price", format_brl(r.target_sale_price));
    line(&mut out, "Margin", format_brl(r.absolute_margin));
    line(&mut out, "Total taxes", format_brl(r.total_taxes));

    if r.target_sale_price.is_zero() && !r.final_cost.is_zero() {
        out.push_str("  ! deductions reach 100%; no sale price covers this cost\n");
    }
    for notice in &report.notices {
        out.push_str(&format!("  ! {notice}\n"));
    }

    if with_matrix {
        out.push('\n');
        out.push_str(&render_matrix(&report.matrix));
    }
    out
}

/// Reform projection report.
pub fn render_reform(report: &ReformReport) -> String {
    let input = &report.input;
    let r = &report.result;
    let mut out = String::new();

    out.push_str(&format!(
        "Reform 2027 projection {} -> {}\n",
        input.origin, input.destination
    ));
    line(
        &mut out,
        "IVA (CBS + IBS)",
        format!("{} ({} + {})", pct(r.total_iva_rate), pct(r.cbs_rate), pct(r.ibs_rate)),
    );
    line(&mut out, "IPI", format_brl(r.ipi_value));
    line(&mut out, "Invoice total", format_brl(r.total_invoice_value));
    line(&mut out, "IVA credit", format_brl(r.iva_credit));
    line(&mut out, "Recognized credit", format_brl(r.recognized_iva_credit));
    line(&mut out, "Final cost", format_brl(r.final_cost));
    line(&mut out, "Deductions with margin", pct(r.total_deductions_with_margin));
    line(&mut out, "Break-even price", format_brl(r.break_even_price));
    line(&mut out, "Target sale price", format_brl(r.target_sale_price));
    line(&mut out, "Margin", format_brl(r.absolute_margin));
    line(&mut out, "CBS", format_brl(r.cbs_amount));
    line(&mut out, "IBS", format_brl(r.ibs_amount));
    line(&mut out, "IVA payable", format_brl(r.iva_payable));
    out
}

/// Matrix as a table: one row per tier, one column per level.
pub fn render_matrix(rows: &[PriceMatrixRow]) -> String {
    let mut out = format!("{:<14}{:>8}", "Tier", "Margin");
    for level in PriceLevel::all() {
        out.push_str(&format!("{:>16}", level.as_str()));
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!("{:<14}{:>8}", row.label, pct(row.margin)));
        for level in PriceLevel::all() {
            let price = row.levels.get(level).copied().unwrap_or(Decimal::ZERO);
            out.push_str(&format!("{:>16}", format_brl(price)));
        }
        out.push('\n');
    }
    out
}

pub fn render_resolution(resolution: &InterstateResolution) -> String {
    let mut out = String::new();
    line(&mut out, "Interstate rate", pct(resolution.rate));
    line(&mut out, "Origin region", resolution.origin_region.as_str());
    line(&mut out, "Destination region", resolution.destination_region.as_str());
    if resolution.intrastate {
        out.push_str("  intrastate movement\n");
    }
    if resolution.has_unrecognized_region() {
        out.push_str("  ! a state is outside the known regions; default bracket applied\n");
    }
    out
}

pub fn render_ncm_entry(entry: &NcmEntry) -> String {
    let cest = entry
        .cest
        .as_ref()
        .map(|c| c.dotted())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  MVA {:>8}  CEST {:<9}  {}",
        entry.code.dotted(),
        pct(entry.mva),
        cest,
        entry.description
    )
}

pub fn render_uf_entry(entry: &UfEntry) -> String {
    format!(
        "{}  {:>7}  {}",
        entry.code,
        pct(entry.internal_rate),
        entry.name
    )
}
