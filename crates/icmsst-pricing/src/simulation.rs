//! # Simulation Preparation
//!
//! Turns what a user types into a fully resolved engine input:
//!
//! 1. **Validate** the draft (codes, money and markups within bounds, percents in range).
//! 2. **Resolve** the interstate rate from origin/destination, the
//!    destination internal rate from the UF table and the original MVA from
//!    the NCM catalog. Explicit values in the draft win over lookups.
//! 3. **Adjust** the MVA for the resolved rates.
//! 4. **Fill** every cost rate the draft leaves out from the
//!    [`PricingProfile`].
//!
//! The calculators never see a draft; this layer never does arithmetic
//! beyond the adjusted MVA.

use icmsst_core::error::ensure_amount;
use icmsst_core::{NcmCode, Percent, TaxRegime, UfCode, ValidationError};
use icmsst_pack::ReferencePack;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::current::{calculate_costs, SimulationInput, SimulationResult};
use crate::error::SimulationError;
use crate::matrix::{generate_price_matrix, PriceMatrixRow};
use crate::profile::PricingProfile;
use crate::rates::{adjusted_mva, resolve_interstate, InterstateResolution, Region};
use crate::reform::{calculate_costs_2027, ReformInput, ReformResult};

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// A current-regime simulation as entered by a user.
///
/// Codes stay as raw strings until [`SimulationDraft::validate`]. Every
/// `Option` rate left empty is resolved from reference data or the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationDraft {
    pub purchase_value: Decimal,
    #[serde(default)]
    pub freight_ipi: Decimal,
    pub regime: TaxRegime,
    /// Falls back to the profile's default origin.
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub ncm: Option<String>,
    /// Original MVA; overrides the catalog value.
    #[serde(default)]
    pub mva: Option<Percent>,
    #[serde(default)]
    pub interstate_rate: Option<Percent>,
    #[serde(default)]
    pub destination_internal_rate: Option<Percent>,
    #[serde(default)]
    pub icms_sale_rate: Option<Percent>,
    #[serde(default)]
    pub pis_cofins_entry_rate: Option<Percent>,
    #[serde(default)]
    pub pis_cofins_sale_rate: Option<Percent>,
    #[serde(default)]
    pub commission_rate: Option<Percent>,
    #[serde(default)]
    pub other_variable_cost_rate: Option<Percent>,
    #[serde(default)]
    pub fixed_cost_rate: Option<Percent>,
    #[serde(default)]
    pub target_result_rate: Option<Percent>,
    #[serde(default)]
    pub base_reduction_rate: Option<Percent>,
    #[serde(default)]
    pub exclude_icms_from_pis_base: Option<bool>,
}

impl SimulationDraft {
    /// A draft with only the required fields set.
    pub fn new(purchase_value: Decimal, regime: TaxRegime, destination: impl Into<String>) -> Self {
        Self {
            purchase_value,
            freight_ipi: Decimal::ZERO,
            regime,
            origin: None,
            destination: destination.into(),
            ncm: None,
            mva: None,
            interstate_rate: None,
            destination_internal_rate: None,
            icms_sale_rate: None,
            pis_cofins_entry_rate: None,
            pis_cofins_sale_rate: None,
            commission_rate: None,
            other_variable_cost_rate: None,
            fixed_cost_rate: None,
            target_result_rate: None,
            base_reduction_rate: None,
            exclude_icms_from_pis_base: None,
        }
    }

    /// Check the fields the calculators take on trust.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_amount("purchase_value", self.purchase_value)?;
        ensure_amount("freight_ipi", self.freight_ipi)?;
        if let Some(origin) = &self.origin {
            UfCode::new(origin)?;
        }
        UfCode::new(&self.destination)?;
        if let Some(ncm) = &self.ncm {
            NcmCode::new(ncm)?;
        }

        if let Some(mva) = self.mva {
            mva.ensure_markup("mva")?;
        }
        let rates = [
            ("interstate_rate", self.interstate_rate),
            ("destination_internal_rate", self.destination_internal_rate),
            ("icms_sale_rate", self.icms_sale_rate),
            ("pis_cofins_entry_rate", self.pis_cofins_entry_rate),
            ("pis_cofins_sale_rate", self.pis_cofins_sale_rate),
            ("commission_rate", self.commission_rate),
            ("other_variable_cost_rate", self.other_variable_cost_rate),
            ("fixed_cost_rate", self.fixed_cost_rate),
            ("target_result_rate", self.target_result_rate),
            ("base_reduction_rate", self.base_reduction_rate),
        ];
        for (field, rate) in rates {
            if let Some(rate) = rate {
                rate.ensure_in_range(field)?;
            }
        }
        Ok(())
    }
}

/// A reform-scenario simulation as entered by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformDraft {
    pub purchase_value: Decimal,
    #[serde(default)]
    pub freight_value: Decimal,
    #[serde(default)]
    pub ipi_rate: Option<Percent>,
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub ncm: Option<String>,
    #[serde(default)]
    pub commission_rate: Option<Percent>,
    #[serde(default)]
    pub other_variable_cost_rate: Option<Percent>,
    #[serde(default)]
    pub fixed_cost_rate: Option<Percent>,
    #[serde(default)]
    pub target_result_rate: Option<Percent>,
}

impl ReformDraft {
    pub fn new(purchase_value: Decimal, destination: impl Into<String>) -> Self {
        Self {
            purchase_value,
            freight_value: Decimal::ZERO,
            ipi_rate: None,
            origin: None,
            destination: destination.into(),
            ncm: None,
            commission_rate: None,
            other_variable_cost_rate: None,
            fixed_cost_rate: None,
            target_result_rate: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_amount("purchase_value", self.purchase_value)?;
        ensure_amount("freight_value", self.freight_value)?;
        if let Some(origin) = &self.origin {
            UfCode::new(origin)?;
        }
        UfCode::new(&self.destination)?;
        if let Some(ncm) = &self.ncm {
            NcmCode::new(ncm)?;
        }
        let rates = [
            ("ipi_rate", self.ipi_rate),
            ("commission_rate", self.commission_rate),
            ("other_variable_cost_rate", self.other_variable_cost_rate),
            ("fixed_cost_rate", self.fixed_cost_rate),
            ("target_result_rate", self.target_result_rate),
        ];
        for (field, rate) in rates {
            if let Some(rate) = rate {
                rate.ensure_in_range(field)?;
            }
        }
        Ok(())
    }
}

/// Fields an invoice-extraction service read off a purchase invoice.
///
/// Only the fields it found are present; [`InvoiceExtraction::apply_to`]
/// leaves the rest of the draft untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceExtraction {
    pub purchase_value: Option<Decimal>,
    pub freight_ipi: Option<Decimal>,
    pub interstate_rate: Option<Percent>,
    pub mva: Option<Percent>,
}

impl InvoiceExtraction {
    /// Merge the extracted fields into a draft.
    pub fn apply_to(&self, draft: &mut SimulationDraft) {
        if let Some(v) = self.purchase_value {
            draft.purchase_value = v;
        }
        if let Some(v) = self.freight_ipi {
            draft.freight_ipi = v;
        }
        if let Some(v) = self.interstate_rate {
            draft.interstate_rate = Some(v);
        }
        if let Some(v) = self.mva {
            draft.mva = Some(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.purchase_value.is_none()
            && self.freight_ipi.is_none()
            && self.interstate_rate.is_none()
            && self.mva.is_none()
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Something the caller should show next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateNotice {
    /// A state is in neither region list; the interstate rate came from
    /// the default bracket.
    UnrecognizedRegion { uf: UfCode, assumed_rate: Percent },
    /// The draft's interstate rate differs from the resolved one.
    InterstateOverridden { resolved: Percent, applied: Percent },
}

impl std::fmt::Display for RateNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedRegion { uf, assumed_rate } => write!(
                f,
                "UF {uf} is not in any known region; interstate rate assumed {assumed_rate}"
            ),
            Self::InterstateOverridden { resolved, applied } => write!(
                f,
                "interstate rate {applied} applied instead of resolved {resolved}"
            ),
        }
    }
}

/// Resolved engine input plus what was learned resolving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedSimulation {
    pub input: SimulationInput,
    pub resolution: InterstateResolution,
    pub notices: Vec<RateNotice>,
}

/// Everything one current-regime run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub input: SimulationInput,
    pub result: SimulationResult,
    pub matrix: Vec<PriceMatrixRow>,
    pub notices: Vec<RateNotice>,
}

/// Everything one reform run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformReport {
    pub input: ReformInput,
    pub result: ReformResult,
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Prepares and runs simulations against one reference pack and profile.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    pack: &'a ReferencePack,
    profile: &'a PricingProfile,
}

impl<'a> Simulator<'a> {
    pub fn new(pack: &'a ReferencePack, profile: &'a PricingProfile) -> Self {
        Self { pack, profile }
    }

    pub fn profile(&self) -> &PricingProfile {
        self.profile
    }

    fn origin(&self, raw: Option<&str>) -> Result<UfCode, SimulationError> {
        match raw {
            Some(code) => Ok(UfCode::new(code)?),
            None => self
                .profile
                .default_origin
                .clone()
                .ok_or(SimulationError::MissingOrigin),
        }
    }

    /// Validate a draft and resolve it into an engine input.
    pub fn prepare(&self, draft: &SimulationDraft) -> Result<PreparedSimulation, SimulationError> {
        draft.validate()?;

        let origin = self.origin(draft.origin.as_deref())?;
        let destination = UfCode::new(&draft.destination)?;
        let ncm = draft.ncm.as_deref().map(NcmCode::new).transpose()?;

        let resolution = resolve_interstate(&origin, &destination);
        let mut notices = Vec::new();
        let interstate_rate = match draft.interstate_rate {
            Some(applied) => {
                if applied != resolution.rate {
                    notices.push(RateNotice::InterstateOverridden {
                        resolved: resolution.rate,
                        applied,
                    });
                }
                applied
            }
            None => {
                if resolution.has_unrecognized_region() {
                    for (uf, region) in [
                        (&origin, resolution.origin_region),
                        (&destination, resolution.destination_region),
                    ] {
                        if region == Region::Unrecognized {
                            tracing::warn!(
                                uf = %uf,
                                assumed_rate = %resolution.rate,
                                "UF outside known regions, default interstate bracket applied"
                            );
                            notices.push(RateNotice::UnrecognizedRegion {
                                uf: uf.clone(),
                                assumed_rate: resolution.rate,
                            });
                        }
                    }
                }
                resolution.rate
            }
        };

        let destination_internal_rate = match draft.destination_internal_rate {
            Some(rate) => rate,
            None => self
                .pack
                .uf
                .internal_rate(&destination)
                .ok_or_else(|| SimulationError::UnknownUf(destination.clone()))?,
        };

        let mva_original = match (draft.mva, &ncm) {
            (Some(mva), _) => mva,
            (None, Some(code)) => self
                .pack
                .ncm
                .get(code)
                .map(|entry| entry.mva)
                .ok_or_else(|| SimulationError::UnknownNcm(code.clone()))?,
            (None, None) if draft.regime.has_substitution() => {
                return Err(SimulationError::MissingMva)
            }
            (None, None) => Percent::ZERO,
        };
        let mva_adjusted = adjusted_mva(mva_original, interstate_rate, destination_internal_rate);

        let profile = self.profile;
        let icms_sale_rate = draft
            .icms_sale_rate
            .or(profile.icms_sale_rate)
            .unwrap_or(if draft.regime.has_substitution() {
                Percent::ZERO
            } else {
                destination_internal_rate
            });

        tracing::debug!(
            origin = %origin,
            destination = %destination,
            interstate_rate = %interstate_rate,
            mva_original = %mva_original,
            mva_adjusted = %mva_adjusted,
            regime = draft.regime.as_str(),
            "simulation prepared"
        );

        let input = SimulationInput {
            purchase_value: draft.purchase_value,
            freight_ipi: draft.freight_ipi,
            mva_original,
            mva_adjusted,
            interstate_rate,
            destination_internal_rate,
            pis_cofins_entry_rate: draft
                .pis_cofins_entry_rate
                .unwrap_or(profile.pis_cofins_entry_rate),
            pis_cofins_sale_rate: draft
                .pis_cofins_sale_rate
                .unwrap_or(profile.pis_cofins_sale_rate),
            icms_sale_rate,
            commission_rate: draft.commission_rate.unwrap_or(profile.commission_rate),
            other_variable_cost_rate: draft
                .other_variable_cost_rate
                .unwrap_or(profile.other_variable_cost_rate),
            fixed_cost_rate: draft.fixed_cost_rate.unwrap_or(profile.fixed_cost_rate),
            target_result_rate: draft.target_result_rate.unwrap_or(profile.target_result_rate),
            base_reduction_rate: draft
                .base_reduction_rate
                .unwrap_or(profile.base_reduction_rate),
            regime: draft.regime,
            origin,
            destination,
            ncm,
            exclude_icms_from_pis_base: draft
                .exclude_icms_from_pis_base
                .unwrap_or(profile.exclude_icms_from_pis_base),
        };

        Ok(PreparedSimulation {
            input,
            resolution,
            notices,
        })
    }

    /// Prepare a draft, run the engine and build the price matrix.
    pub fn run(&self, draft: &SimulationDraft) -> Result<SimulationReport, SimulationError> {
        let PreparedSimulation { input, notices, .. } = self.prepare(draft)?;
        let result = calculate_costs(&input);
        let matrix = generate_price_matrix(result.final_cost, &input);
        Ok(SimulationReport {
            input,
            result,
            matrix,
            notices,
        })
    }

    /// Validate a reform draft and fill it from the profile.
    pub fn prepare_reform(&self, draft: &ReformDraft) -> Result<ReformInput, SimulationError> {
        draft.validate()?;
        let profile = self.profile;
        Ok(ReformInput {
            purchase_value: draft.purchase_value,
            freight_value: draft.freight_value,
            ipi_rate: draft.ipi_rate.unwrap_or(Percent::ZERO),
            commission_rate: draft.commission_rate.unwrap_or(profile.commission_rate),
            other_variable_cost_rate: draft
                .other_variable_cost_rate
                .unwrap_or(profile.other_variable_cost_rate),
            fixed_cost_rate: draft.fixed_cost_rate.unwrap_or(profile.fixed_cost_rate),
            target_result_rate: draft.target_result_rate.unwrap_or(profile.target_result_rate),
            origin: self.origin(draft.origin.as_deref())?,
            destination: UfCode::new(&draft.destination)?,
            ncm: draft.ncm.as_deref().map(NcmCode::new).transpose()?,
        })
    }

    /// Prepare and run a reform draft with the profile's reform rates.
    pub fn run_reform(&self, draft: &ReformDraft) -> Result<ReformReport, SimulationError> {
        let input = self.prepare_reform(draft)?;
        let result = calculate_costs_2027(&input, &self.profile.reform);
        Ok(ReformReport { input, result })
    }
}
