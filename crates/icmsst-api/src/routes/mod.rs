//! # API Route Modules
//!
//! - `pricing`: simulations, current-regime and reform engines, price matrix.
//! - `rates`: interstate rate resolution and adjusted MVA.
//! - `reference`: NCM catalog and UF table lookups.

pub mod pricing;
pub mod rates;
pub mod reference;
