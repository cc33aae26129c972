//! # Pricing Profile
//!
//! Company-level defaults for the rates a user rarely changes between
//! simulations. A profile is loaded once and passed into every
//! [`Simulator`](crate::simulation::Simulator); nothing reads it globally.
//!
//! ```yaml
//! pis_cofins_entry_rate: "9.25"
//! pis_cofins_sale_rate: "9.25"
//! icms_sale_rate: "18"        # omit to use the destination internal rate
//! commission_rate: "3"
//! other_variable_cost_rate: "2"
//! fixed_cost_rate: "10"
//! target_result_rate: "8"
//! default_origin: PR
//! reform:
//!   cbs: "8.8"
//!   ibs: "17.7"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use icmsst_core::{Percent, UfCode, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::reform::ReformRates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingProfile {
    pub pis_cofins_entry_rate: Percent,
    pub pis_cofins_sale_rate: Percent,
    /// Sale-side ICMS. `None` means the destination internal rate, except
    /// under `substituido` where ICMS was already collected and it is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icms_sale_rate: Option<Percent>,
    pub commission_rate: Percent,
    pub other_variable_cost_rate: Percent,
    pub fixed_cost_rate: Percent,
    pub target_result_rate: Percent,
    pub base_reduction_rate: Percent,
    pub exclude_icms_from_pis_base: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_origin: Option<UfCode>,
    pub reform: ReformRates,
}

impl Default for PricingProfile {
    fn default() -> Self {
        Self {
            pis_cofins_entry_rate: Percent::from_parts(925, 2),
            pis_cofins_sale_rate: Percent::from_parts(925, 2),
            icms_sale_rate: None,
            commission_rate: Percent::from(3),
            other_variable_cost_rate: Percent::from(2),
            fixed_cost_rate: Percent::from(10),
            target_result_rate: Percent::from(8),
            base_reduction_rate: Percent::ZERO,
            exclude_icms_from_pis_base: false,
            default_origin: None,
            reform: ReformRates::default(),
        }
    }
}

impl PricingProfile {
    /// Parse and validate a profile from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        let profile: PricingProfile = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse and validate a profile file.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "pricing profile loaded");
        Ok(profile)
    }

    /// Check every rate lies within 0–100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pis_cofins_entry_rate.ensure_in_range("pis_cofins_entry_rate")?;
        self.pis_cofins_sale_rate.ensure_in_range("pis_cofins_sale_rate")?;
        if let Some(rate) = self.icms_sale_rate {
            rate.ensure_in_range("icms_sale_rate")?;
        }
        self.commission_rate.ensure_in_range("commission_rate")?;
        self.other_variable_cost_rate.ensure_in_range("other_variable_cost_rate")?;
        self.fixed_cost_rate.ensure_in_range("fixed_cost_rate")?;
        self.target_result_rate.ensure_in_range("target_result_rate")?;
        self.base_reduction_rate.ensure_in_range("base_reduction_rate")?;
        self.reform.cbs.ensure_in_range("reform.cbs")?;
        self.reform.ibs.ensure_in_range("reform.ibs")?;
        self.reform
            .credit_recognition
            .ensure_in_range("reform.credit_recognition")?;
        Ok(())
    }
}
