//! # Tax Regimes
//!
//! The three ICMS treatments a resale item can fall under. The regime decides
//! whether substitution tax is computed on entry and how the sale-side ICMS
//! rate enters the deduction stack.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// ICMS treatment of the item being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    /// ICMS-ST: substitution tax is prepaid on entry.
    Substituido,
    /// Regular ICMS debit/credit on each operation.
    Tributado,
    /// Regular ICMS with a reduced calculation base on the sale.
    Reduzido,
}

impl TaxRegime {
    /// Return the string representation of this regime.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substituido => "substituido",
            Self::Tributado => "tributado",
            Self::Reduzido => "reduzido",
        }
    }

    /// Return all regime variants.
    pub fn all() -> &'static [TaxRegime] {
        &[Self::Substituido, Self::Tributado, Self::Reduzido]
    }

    /// Whether substitution tax applies on entry.
    pub fn has_substitution(&self) -> bool {
        matches!(self, Self::Substituido)
    }
}

impl FromStr for TaxRegime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substituido" | "st" => Ok(Self::Substituido),
            "tributado" => Ok(Self::Tributado),
            "reduzido" => Ok(Self::Reduzido),
            _ => Err(ValidationError::InvalidRegime(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regime_count() {
        assert_eq!(TaxRegime::all().len(), 3);
    }

    #[test]
    fn parse_round_trips_as_str() {
        for regime in TaxRegime::all() {
            assert_eq!(regime.as_str().parse::<TaxRegime>().unwrap(), *regime);
        }
        assert_eq!("ST".parse::<TaxRegime>().unwrap(), TaxRegime::Substituido);
        assert!("isento".parse::<TaxRegime>().is_err());
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&TaxRegime::Reduzido).unwrap();
        assert_eq!(json, "\"reduzido\"");
        let back: TaxRegime = serde_json::from_str("\"substituido\"").unwrap();
        assert_eq!(back, TaxRegime::Substituido);
    }

    #[test]
    fn only_substituido_has_substitution() {
        assert!(TaxRegime::Substituido.has_substitution());
        assert!(!TaxRegime::Tributado.has_substitution());
        assert!(!TaxRegime::Reduzido.has_substitution());
    }
}
