//! # UF Table
//!
//! Brazilian federative units and their internal ICMS rates. The internal
//! rate of the destination state is the rate applied to the ICMS-ST base and
//! the denominator of the adjusted-MVA formula.
//!
//! Rates are simplified configuration data (the modal internal rate, FECP
//! surcharges folded in where the state applies one to most goods), not a
//! statement of current law.

use std::collections::BTreeMap;

use icmsst_core::{Percent, UfCode};
use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// One state row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UfEntry {
    /// Two-letter code.
    pub code: UfCode,
    /// State name.
    pub name: String,
    /// Internal ICMS rate.
    pub internal_rate: Percent,
}

/// Immutable table of states keyed by code.
#[derive(Debug, Clone, Default)]
pub struct UfTable {
    entries: BTreeMap<UfCode, UfEntry>,
}

impl UfTable {
    /// Build a table from rows, rejecting duplicates and out-of-range rates.
    pub fn from_entries(entries: Vec<UfEntry>) -> Result<Self, PackError> {
        if entries.is_empty() {
            return Err(PackError::EmptyTable { table: "uf" });
        }
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.internal_rate.ensure_in_range("internal_rate").is_err() {
                return Err(PackError::InvalidEntry {
                    table: "uf",
                    code: entry.code.to_string(),
                    reason: format!("internal rate {} outside 0-100", entry.internal_rate),
                });
            }
            let code = entry.code.clone();
            if map.insert(code.clone(), entry).is_some() {
                return Err(PackError::DuplicateCode {
                    table: "uf",
                    code: code.to_string(),
                });
            }
        }
        Ok(Self { entries: map })
    }

    /// Look up a state.
    pub fn get(&self, code: &UfCode) -> Option<&UfEntry> {
        self.entries.get(code)
    }

    /// Internal ICMS rate of a state, if listed.
    pub fn internal_rate(&self, code: &UfCode) -> Option<Percent> {
        self.entries.get(code).map(|e| e.internal_rate)
    }

    /// Iterate rows in code order.
    pub fn iter(&self) -> impl Iterator<Item = &UfEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in table of all 27 units.
    pub(crate) fn builtin() -> Self {
        let entries = BUILTIN_UF
            .iter()
            .filter_map(|(code, name, rate_hundredths)| match UfCode::new(code) {
                Ok(code) => Some(UfEntry {
                    code,
                    name: (*name).to_string(),
                    internal_rate: Percent::from_parts(*rate_hundredths, 2),
                }),
                Err(e) => {
                    tracing::error!(error = %e, "skipping malformed built-in UF row");
                    None
                }
            })
            .map(|e| (e.code.clone(), e))
            .collect();
        Self { entries }
    }
}

/// (code, name, internal rate in hundredths of a percent)
const BUILTIN_UF: &[(&str, &str, i64)] = &[
    ("AC", "Acre", 1900),
    ("AL", "Alagoas", 1900),
    ("AM", "Amazonas", 2000),
    ("AP", "Amapá", 1800),
    ("BA", "Bahia", 2050),
    ("CE", "Ceará", 2000),
    ("DF", "Distrito Federal", 2000),
    ("ES", "Espírito Santo", 1700),
    ("GO", "Goiás", 1900),
    ("MA", "Maranhão", 2300),
    ("MG", "Minas Gerais", 1800),
    ("MS", "Mato Grosso do Sul", 1700),
    ("MT", "Mato Grosso", 1700),
    ("PA", "Pará", 1900),
    ("PB", "Paraíba", 2000),
    ("PE", "Pernambuco", 2050),
    ("PI", "Piauí", 2250),
    ("PR", "Paraná", 1950),
    ("RJ", "Rio de Janeiro", 2200),
    ("RN", "Rio Grande do Norte", 1800),
    ("RO", "Rondônia", 1950),
    ("RR", "Roraima", 2000),
    ("RS", "Rio Grande do Sul", 1700),
    ("SC", "Santa Catarina", 1700),
    ("SE", "Sergipe", 1900),
    ("SP", "São Paulo", 1800),
    ("TO", "Tocantins", 2000),
];
