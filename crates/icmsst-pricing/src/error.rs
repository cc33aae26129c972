//! # Error Types
//!
//! Failures of the preparation layer. The calculators in `current`,
//! `reform`, `matrix` and `rates` are total and have no error type.

use std::path::PathBuf;

use icmsst_core::{NcmCode, UfCode, ValidationError};
use thiserror::Error;

/// Preparing a simulation from a draft failed.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A draft field failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Destination state has no internal rate in the reference pack and no
    /// override was given.
    #[error("UF {0} is not in the reference table; supply destination_internal_rate")]
    UnknownUf(UfCode),

    /// NCM code is not in the catalog and no MVA override was given.
    #[error("NCM {0} is not in the catalog; supply mva")]
    UnknownNcm(NcmCode),

    /// No origin in the draft and no default origin in the profile.
    #[error("origin UF is required (no default origin configured)")]
    MissingOrigin,

    /// `substituido` needs an MVA, from an NCM code or an explicit value.
    #[error("regime substituido requires an NCM code or an explicit mva")]
    MissingMva,
}

/// Loading a pricing profile failed.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse profile: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid profile: {0}")]
    Invalid(#[from] ValidationError),
}
