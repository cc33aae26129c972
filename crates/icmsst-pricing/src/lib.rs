//! # icmsst-pricing — ICMS-ST Pricing Engine
//!
//! Pure, deterministic calculators over decimal inputs, plus the thin layer
//! that prepares their inputs from user drafts and reference data.
//!
//! ## Architecture
//!
//! - **Rates** (`rates.rs`): interstate ICMS rate by origin/destination
//!   region, and the adjusted-MVA formula.
//!
//! - **Deductions** (`deductions.rs`): the sale-side deduction stack and the
//!   markup-on-price inversion shared by every engine.
//!
//! - **Current regime** (`current.rs`): ICMS-ST base/debit/credit, net cost,
//!   break-even and target sale price under `substituido`, `tributado` and
//!   `reduzido`.
//!
//! - **Reform** (`reform.rs`): the 2027 dual-VAT (CBS + IBS) projection.
//!
//! - **Matrix** (`matrix.rs`): prices at five margin tiers, four display
//!   levels each.
//!
//! - **Profile** (`profile.rs`) and **Simulation** (`simulation.rs`): the
//!   caller side. Company defaults, input validation, reference-data lookup,
//!   and rate resolution happen here, never inside the calculators.
//!
//! ## Determinism
//!
//! The calculators own no state, perform no I/O and emit no logs. Identical
//! inputs produce identical outputs, so they may be called concurrently from
//! any number of threads.

pub mod current;
pub mod deductions;
pub mod error;
pub mod matrix;
pub mod profile;
pub mod rates;
pub mod reform;
pub mod simulation;

pub use current::{calculate_costs, SimulationInput, SimulationResult};
pub use deductions::{invert_price, DeductionRates, DeductionStack};
pub use error::{ProfileError, SimulationError};
pub use matrix::{generate_price_matrix, PriceLevel, PriceMatrixRow};
pub use profile::PricingProfile;
pub use rates::{adjusted_mva, interstate_rate, resolve_interstate, InterstateResolution, Region};
pub use reform::{calculate_costs_2027, ReformInput, ReformRates, ReformResult};
pub use simulation::{
    InvoiceExtraction, PreparedSimulation, RateNotice, ReformDraft, ReformReport,
    SimulationDraft, SimulationReport, Simulator,
};
