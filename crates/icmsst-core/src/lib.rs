//! # icmsst-core — Foundational Types for ICMS-ST Pricing
//!
//! Every other crate in the workspace depends on `icmsst-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain codes.** `UfCode`, `NcmCode`, `CestCode`
//!    validate format at construction. No bare strings for state or
//!    classification codes.
//!
//! 2. **`Percent` is never a fraction.** Rates are carried on the 0–100 scale
//!    and converted with [`Percent::fraction`] at the point of arithmetic.
//!
//! 3. **Decimal money.** Monetary values are `rust_decimal::Decimal`. There is
//!    no `f64` anywhere in the pricing path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `icmsst-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod format;
pub mod identity;
pub mod percent;
pub mod regime;

pub use error::ValidationError;
pub use format::{format_brl, format_percent, round_money};
pub use identity::{CestCode, NcmCode, UfCode};
pub use percent::Percent;
pub use regime::TaxRegime;

pub use rust_decimal::Decimal;
