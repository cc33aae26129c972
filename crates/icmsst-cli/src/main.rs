//! # icmsst CLI entry point
//!
//! Parses command-line arguments, loads the pricing profile and reference
//! pack once, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use icmsst_cli::matrix::{run_matrix, MatrixArgs};
use icmsst_cli::rates::{run_rates, RatesArgs};
use icmsst_cli::reference::{run_ncm, run_uf, NcmArgs, UfArgs};
use icmsst_cli::reform::{run_reform, ReformArgs};
use icmsst_cli::simulate::{run_simulate, SimulateArgs};
use icmsst_cli::Context;

/// ICMS-ST pricing toolkit.
///
/// Computes landed cost and sale prices under the current ICMS regimes,
/// projects the 2027 CBS/IBS scenario, and browses NCM/UF reference data.
#[derive(Parser, Debug)]
#[command(name = "icmsst", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pricing profile (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference pack (YAML) replacing the built-in NCM/UF data.
    #[arg(long, global = true)]
    pack: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate landed cost and sale price under the current regime.
    Simulate(SimulateArgs),

    /// Project a purchase into the 2027 CBS/IBS scenario.
    Reform(ReformArgs),

    /// Price matrix for a known final cost.
    Matrix(MatrixArgs),

    /// Interstate rate and adjusted MVA.
    Rates(RatesArgs),

    /// Browse the NCM catalog.
    Ncm(NcmArgs),

    /// Browse the UF internal-rate table.
    Uf(UfArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("icmsst CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = match Context::load(cli.config.as_deref(), cli.pack.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match &cli.command {
        Commands::Simulate(args) => run_simulate(args, &ctx),
        Commands::Reform(args) => run_reform(args, &ctx),
        Commands::Matrix(args) => run_matrix(args, &ctx),
        Commands::Rates(args) => run_rates(args),
        Commands::Ncm(args) => run_ncm(args, &ctx),
        Commands::Uf(args) => run_uf(args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
