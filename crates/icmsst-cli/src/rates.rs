//! # Rates Subcommand
//!
//! Stand-alone access to the rate resolver: the interstate ICMS rate for a
//! pair of states and the adjusted MVA for a set of rates.

use anyhow::Result;
use clap::{Args, Subcommand};
use icmsst_core::{format_percent, Percent, UfCode};
use icmsst_pricing::{adjusted_mva, resolve_interstate};

use crate::report::render_resolution;

/// Arguments for the `icmsst rates` subcommand.
#[derive(Args, Debug)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Interstate ICMS rate between two states.
    Interstate {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
    },
    /// MVA adjusted for the interstate and destination internal rates.
    Mva {
        #[arg(long)]
        original: Percent,
        #[arg(long)]
        interstate: Percent,
        #[arg(long)]
        destination_internal: Percent,
    },
}

pub fn rates_output(args: &RatesArgs) -> Result<String> {
    match &args.command {
        RatesCommand::Interstate {
            origin,
            destination,
        } => {
            let origin = UfCode::new(origin)?;
            let destination = UfCode::new(destination)?;
            let resolution = resolve_interstate(&origin, &destination);
            Ok(format!("{origin} -> {destination}\n{}", render_resolution(&resolution)))
        }
        RatesCommand::Mva {
            original,
            interstate,
            destination_internal,
        } => {
            for (field, rate) in [
                ("interstate", interstate),
                ("destination_internal", destination_internal),
            ] {
                rate.ensure_in_range(field)?;
            }
            original.ensure_markup("original")?;
            let adjusted = adjusted_mva(*original, *interstate, *destination_internal);
            Ok(format!("Adjusted MVA: {}", format_percent(adjusted.value())))
        }
    }
}

/// Execute the rates subcommand.
pub fn run_rates(args: &RatesArgs) -> Result<u8> {
    println!("{}", rates_output(args)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RatesArgs,
    }

    fn run(argv: &[&str]) -> Result<String> {
        let mut full = vec!["icmsst"];
        full.extend_from_slice(argv);
        rates_output(&Harness::parse_from(full).args)
    }

    #[test]
    fn south_to_north_is_seven() {
        let text = run(&["interstate", "--origin", "SP", "--destination", "BA"]).unwrap();
        assert!(text.starts_with("SP -> BA"));
        assert!(text.contains("7,00%"));
        assert!(!text.contains("intrastate"));
    }

    #[test]
    fn same_state_is_intrastate() {
        let text = run(&["interstate", "--origin", "mg", "--destination", "MG"]).unwrap();
        assert!(text.contains("0,00%"));
        assert!(text.contains("intrastate movement"));
    }

    #[test]
    fn unrecognized_state_is_flagged() {
        let text = run(&["interstate", "--origin", "ZZ", "--destination", "SP"]).unwrap();
        assert!(text.contains("12,00%"));
        assert!(text.contains("outside the known regions"));
    }

    #[test]
    fn invalid_code_is_an_error() {
        assert!(run(&["interstate", "--origin", "S1", "--destination", "SP"]).is_err());
    }

    #[test]
    fn adjusted_mva_for_twelve_percent() {
        let text = run(&[
            "mva",
            "--original",
            "71,78",
            "--interstate",
            "12",
            "--destination-internal",
            "18",
        ])
        .unwrap();
        // (1.7178 * 0.88 / 0.82) - 1 = 84.35%
        assert_eq!(text, "Adjusted MVA: 84,35%");
    }

    #[test]
    fn out_of_range_rate_is_an_error() {
        let err = run(&["mva", "--original", "40", "--interstate", "112", "--destination-internal", "18"])
            .unwrap_err();
        assert!(err.to_string().contains("interstate"));
    }
}
