//! # NCM Catalog
//!
//! Tax-classification codes subject to ICMS-ST, each with the original MVA
//! (margem de valor agregado) the pricing layer feeds into the adjusted-MVA
//! formula, and the CEST code where one is assigned.
//!
//! The built-in catalog is a representative product list; MVA values are
//! simplified configuration data.

use std::collections::BTreeMap;

use icmsst_core::{CestCode, NcmCode, Percent};
use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// One classification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcmEntry {
    pub code: NcmCode,
    pub description: String,
    /// Original (non-adjusted) MVA.
    pub mva: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cest: Option<CestCode>,
}

/// Immutable catalog keyed by NCM code.
#[derive(Debug, Clone, Default)]
pub struct NcmCatalog {
    entries: BTreeMap<NcmCode, NcmEntry>,
}

impl NcmCatalog {
    /// Build a catalog from rows, rejecting duplicate codes and MVAs that are
    /// negative or above [`Percent::MAX_MARKUP`].
    pub fn from_entries(entries: Vec<NcmEntry>) -> Result<Self, PackError> {
        if entries.is_empty() {
            return Err(PackError::EmptyTable { table: "ncm" });
        }
        let mut map = BTreeMap::new();
        for entry in entries {
            if let Err(e) = entry.mva.ensure_markup("mva") {
                return Err(PackError::InvalidEntry {
                    table: "ncm",
                    code: entry.code.to_string(),
                    reason: e.to_string(),
                });
            }
            let code = entry.code.clone();
            if map.insert(code.clone(), entry).is_some() {
                return Err(PackError::DuplicateCode {
                    table: "ncm",
                    code: code.to_string(),
                });
            }
        }
        Ok(Self { entries: map })
    }

    /// Look up an entry by code.
    pub fn get(&self, code: &NcmCode) -> Option<&NcmEntry> {
        self.entries.get(code)
    }

    /// Search by code prefix or description substring.
    ///
    /// A query made only of digits and dots matches code prefixes
    /// (`8708` matches every `8708.xx.xx`). Anything else matches description
    /// text, ignoring case and Portuguese diacritics. An empty query returns
    /// the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&NcmEntry> {
        let query = query.trim();
        if query.is_empty() {
            return self.entries.values().collect();
        }

        if query.chars().all(|c| c.is_ascii_digit() || c == '.') {
            let prefix: String = query.chars().filter(|c| *c != '.').collect();
            return self
                .entries
                .values()
                .filter(|e| e.code.digits().starts_with(&prefix))
                .collect();
        }

        let needle = fold(query);
        self.entries
            .values()
            .filter(|e| fold(&e.description).contains(&needle))
            .collect()
    }

    /// Iterate rows in code order.
    pub fn iter(&self) -> impl Iterator<Item = &NcmEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in catalog.
    pub(crate) fn builtin() -> Self {
        Self::from_static_rows(BUILTIN_NCM)
    }

    /// Rows that fail to parse are logged and skipped. A malformed CEST only
    /// drops the CEST.
    fn from_static_rows(rows: &[NcmRow]) -> Self {
        let entries = rows
            .iter()
            .filter_map(|(code, description, mva_hundredths, cest)| {
                let code = match NcmCode::new(code) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::error!(error = %e, "skipping malformed built-in NCM row");
                        return None;
                    }
                };
                let cest = match cest.map(CestCode::new) {
                    Some(Ok(c)) => Some(c),
                    Some(Err(e)) => {
                        tracing::error!(
                            ncm = %code,
                            error = %e,
                            "dropping malformed CEST from built-in NCM row"
                        );
                        None
                    }
                    None => None,
                };
                Some(NcmEntry {
                    code,
                    description: (*description).to_string(),
                    mva: Percent::from_parts(*mva_hundredths, 2),
                    cest,
                })
            })
            .map(|e| (e.code.clone(), e))
            .collect();
        Self { entries }
    }
}

/// Lowercase and strip the diacritics that occur in Portuguese text.
fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// (code, description, original MVA in hundredths of a percent, CEST)
type NcmRow = (&'static str, &'static str, i64, Option<&'static str>);

const BUILTIN_NCM: &[NcmRow] = &[
    ("2203.00.00", "Cervejas de malte", 7000, None),
    ("2523.29.10", "Cimento Portland comum", 2000, Some("0500100")),
    ("2710.19.32", "Óleos lubrificantes sem aditivos", 6131, Some("0600700")),
    ("3004.90.99", "Outros medicamentos em doses ou acondicionados para venda a retalho", 3310, None),
    ("3208.10.10", "Tintas e vernizes à base de poliésteres", 3500, None),
    ("3917.23.00", "Tubos rígidos de polímeros de cloreto de vinila", 3700, None),
    ("4009.11.00", "Tubos de borracha vulcanizada não endurecida, sem reforço e sem acessórios", 7178, Some("0100100")),
    ("4011.10.00", "Pneus novos de borracha dos tipos utilizados em automóveis de passageiros", 4200, Some("1600100")),
    ("4013.10.90", "Câmaras de ar de borracha dos tipos utilizados em automóveis", 4500, None),
    ("4016.93.00", "Juntas, gaxetas e semelhantes de borracha vulcanizada", 7178, Some("0100400")),
    ("6910.10.00", "Pias, lavatórios, banheiras e aparelhos sanitários de porcelana", 4100, None),
    ("7007.11.00", "Vidros temperados de dimensões e formatos próprios para veículos", 7178, Some("0101000")),
    ("7214.20.00", "Barras de ferro ou aço com nervuras obtidas durante a laminagem (vergalhões)", 4000, None),
    ("8421.23.00", "Aparelhos para filtrar óleos minerais nos motores de ignição por centelha ou compressão", 7178, None),
    ("8507.10.00", "Acumuladores elétricos de chumbo do tipo utilizado para arranque dos motores", 7178, None),
    ("8511.10.00", "Velas de ignição", 7178, None),
    ("8536.50.90", "Outros interruptores, seccionadores e comutadores", 3730, None),
    ("8539.22.00", "Lâmpadas de filamento de potência não superior a 200 W", 4646, None),
    ("8708.30.90", "Freios e servo-freios e suas partes", 7178, None),
    ("8708.80.00", "Sistemas de suspensão e suas partes, incluindo amortecedores", 7178, None),
    ("8708.99.90", "Outras partes e acessórios para veículos automóveis", 7178, Some("0107500")),
    ("9603.21.00", "Escovas de dentes, incluindo as escovas para dentaduras", 3144, None),
];
