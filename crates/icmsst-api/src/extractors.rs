//! # Custom Extractors & Validation
//!
//! The [`Validate`] trait for request bodies and a helper to extract and
//! validate JSON in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use icmsst_core::error::ensure_amount;
use icmsst_core::ValidationError;
use icmsst_pricing::{ReformDraft, SimulationDraft, SimulationInput};

use crate::error::AppError;

/// Request types with rules beyond what deserialization checks.
pub trait Validate {
    /// Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

impl Validate for SimulationDraft {
    fn validate(&self) -> Result<(), String> {
        SimulationDraft::validate(self).map_err(|e| e.to_string())
    }
}

impl Validate for ReformDraft {
    fn validate(&self) -> Result<(), String> {
        ReformDraft::validate(self).map_err(|e| e.to_string())
    }
}

/// A fully resolved input is taken as-is by the engine; only the ranges
/// are checked here. MVA fields are markups and may exceed 100 up to
/// [`Percent::MAX_MARKUP`](icmsst_core::Percent::MAX_MARKUP).
impl Validate for SimulationInput {
    fn validate(&self) -> Result<(), String> {
        check_simulation_input(self).map_err(|e| e.to_string())
    }
}

pub(crate) fn check_simulation_input(input: &SimulationInput) -> Result<(), ValidationError> {
    ensure_amount("purchase_value", input.purchase_value)?;
    ensure_amount("freight_ipi", input.freight_ipi)?;
    input.mva_original.ensure_markup("mva_original")?;
    input.mva_adjusted.ensure_markup("mva_adjusted")?;
    let rates = [
        ("interstate_rate", input.interstate_rate),
        ("destination_internal_rate", input.destination_internal_rate),
        ("pis_cofins_entry_rate", input.pis_cofins_entry_rate),
        ("pis_cofins_sale_rate", input.pis_cofins_sale_rate),
        ("icms_sale_rate", input.icms_sale_rate),
        ("commission_rate", input.commission_rate),
        ("other_variable_cost_rate", input.other_variable_cost_rate),
        ("fixed_cost_rate", input.fixed_cost_rate),
        ("target_result_rate", input.target_result_rate),
        ("base_reduction_rate", input.base_reduction_rate),
    ];
    for (field, rate) in rates {
        rate.ensure_in_range(field)?;
    }
    Ok(())
}
