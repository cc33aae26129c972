//! # icmsst-cli — Command-Line Tool for ICMS-ST Pricing
//!
//! Provides the `icmsst` command-line interface over the pricing engines
//! and the reference pack.
//!
//! ## Subcommands
//!
//! - `icmsst simulate`: current-regime simulation from a draft.
//! - `icmsst reform`: 2027 dual-VAT projection.
//! - `icmsst matrix`: price matrix for a known final cost.
//! - `icmsst rates`: interstate rate and adjusted MVA.
//! - `icmsst ncm`, `icmsst uf`: reference pack browsing.
//!
//! ```bash
//! icmsst simulate --purchase 100 --regime substituido --origin PR --destination SP --ncm 8708.99.90
//! icmsst --config profile.yaml reform --purchase 1000 --freight 50 --ipi 10 --destination BA
//! icmsst rates interstate --origin SP --destination BA
//! icmsst ncm search pneus
//! ```

pub mod matrix;
pub mod rates;
pub mod reference;
pub mod reform;
pub mod report;
pub mod simulate;

use std::path::Path;

use anyhow::{Context as _, Result};
use icmsst_pack::ReferencePack;
use icmsst_pricing::{PricingProfile, Simulator};

/// Reference pack and pricing profile every subcommand runs against.
#[derive(Debug, Clone)]
pub struct Context {
    pub pack: ReferencePack,
    pub profile: PricingProfile,
}

impl Context {
    /// Load the optional profile and pack files, falling back to built-ins.
    pub fn load(profile: Option<&Path>, pack: Option<&Path>) -> Result<Self> {
        let profile = match profile {
            Some(path) => PricingProfile::from_path(path)
                .with_context(|| format!("loading profile {}", path.display()))?,
            None => PricingProfile::default(),
        };
        let pack = match pack {
            Some(path) => ReferencePack::from_path(path)
                .with_context(|| format!("loading reference pack {}", path.display()))?,
            None => ReferencePack::builtin().clone(),
        };
        tracing::debug!(
            ncm_entries = pack.ncm.len(),
            uf_entries = pack.uf.len(),
            "context loaded"
        );
        Ok(Self { pack, profile })
    }

    pub fn simulator(&self) -> Simulator<'_> {
        Simulator::new(&self.pack, &self.profile)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            pack: ReferencePack::builtin().clone(),
            profile: PricingProfile::default(),
        }
    }
}
