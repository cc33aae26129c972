//! # Code Newtypes
//!
//! Domain-primitive newtypes for the codes that address reference data.
//! Each code is a distinct type; an [`NcmCode`] cannot be passed where a
//! [`UfCode`] is expected.
//!
//! ## Validation
//!
//! - [`UfCode`]: two ASCII letters, stored uppercase ("sp" becomes "SP").
//!   Membership in the list of Brazilian states is NOT checked here; the
//!   reference pack and the rate resolver decide what an unknown code means.
//! - [`NcmCode`]: eight digits, stored without punctuation, displayed as
//!   `XXXX.XX.XX`.
//! - [`CestCode`]: seven digits, stored without punctuation, displayed as
//!   `XX.XXX.XX`.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// UF
// ---------------------------------------------------------------------------

/// Brazilian federative unit (state) abbreviation, e.g. `SP`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UfCode(String);

impl UfCode {
    /// Create a UF code, trimming whitespace and uppercasing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUf`] if the trimmed value is not
    /// exactly two ASCII letters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        let s = raw.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidUf(raw.to_string()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Access the uppercase code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UfCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for UfCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for UfCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UfCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// NCM
// ---------------------------------------------------------------------------

/// Nomenclatura Comum do Mercosul code (8 digits).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NcmCode(String);

impl NcmCode {
    /// Create an NCM code from `87089990` or `8708.99.90`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNcm`] if the value does not reduce to
    /// exactly eight digits after removing dots.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        let digits = strip_dots(raw.trim(), 8)
            .ok_or_else(|| ValidationError::InvalidNcm(raw.to_string()))?;
        Ok(Self(digits))
    }

    /// The bare eight digits.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// The dotted display form, e.g. `8708.99.90`.
    pub fn dotted(&self) -> String {
        format!("{}.{}.{}", &self.0[..4], &self.0[4..6], &self.0[6..])
    }

    /// The chapter (first two digits).
    pub fn chapter(&self) -> &str {
        &self.0[..2]
    }
}

impl FromStr for NcmCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for NcmCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl Serialize for NcmCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.dotted())
    }
}

impl<'de> Deserialize<'de> for NcmCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// CEST
// ---------------------------------------------------------------------------

/// Código Especificador da Substituição Tributária (7 digits).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CestCode(String);

impl CestCode {
    /// Create a CEST code from `0100100` or `01.001.00`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCest`] if the value does not reduce
    /// to exactly seven digits after removing dots.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        let digits = strip_dots(raw.trim(), 7)
            .ok_or_else(|| ValidationError::InvalidCest(raw.to_string()))?;
        Ok(Self(digits))
    }

    /// The bare seven digits.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// The dotted display form, e.g. `01.001.00`.
    pub fn dotted(&self) -> String {
        format!("{}.{}.{}", &self.0[..2], &self.0[2..5], &self.0[5..])
    }
}

impl std::fmt::Display for CestCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl Serialize for CestCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.dotted())
    }
}

impl<'de> Deserialize<'de> for CestCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Remove dots and return the digits if exactly `len` ASCII digits remain.
fn strip_dots(s: &str, len: usize) -> Option<String> {
    let digits: String = s.chars().filter(|c| *c != '.').collect();
    if digits.len() == len && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
