//! # Reference Pack
//!
//! Bundles the NCM catalog and the UF table. A pack is immutable once
//! built; callers share it by reference (`&'static` for the built-in pack,
//! `Arc` for an operator-supplied one).
//!
//! ## YAML format
//!
//! ```yaml
//! ncm:
//!   - code: "8708.99.90"
//!     description: Outras partes e acessórios para veículos automóveis
//!     mva: "71.78"
//!     cest: "01.075.00"
//! uf:            # optional; the built-in UF table is used when absent
//!   - code: SP
//!     name: São Paulo
//!     internal_rate: "18"
//! ```

use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::PackError;
use crate::ncm::{NcmCatalog, NcmEntry};
use crate::uf::{UfEntry, UfTable};

/// NCM catalog plus UF table.
#[derive(Debug, Clone)]
pub struct ReferencePack {
    pub ncm: NcmCatalog,
    pub uf: UfTable,
}

#[derive(Debug, Deserialize)]
struct PackDocument {
    ncm: Vec<NcmEntry>,
    #[serde(default)]
    uf: Option<Vec<UfEntry>>,
}

static BUILTIN: OnceLock<ReferencePack> = OnceLock::new();

impl ReferencePack {
    /// The built-in pack, constructed on first access.
    pub fn builtin() -> &'static ReferencePack {
        BUILTIN.get_or_init(|| {
            let pack = ReferencePack {
                ncm: NcmCatalog::builtin(),
                uf: UfTable::builtin(),
            };
            tracing::debug!(
                ncm_entries = pack.ncm.len(),
                uf_entries = pack.uf.len(),
                "built-in reference pack loaded"
            );
            pack
        })
    }

    /// Parse a pack from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PackError> {
        let doc: PackDocument = serde_yaml::from_str(yaml)?;
        let ncm = NcmCatalog::from_entries(doc.ncm)?;
        let uf = match doc.uf {
            Some(rows) => UfTable::from_entries(rows)?,
            None => UfTable::builtin(),
        };
        Ok(Self { ncm, uf })
    }

    /// Read and parse a pack from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, PackError> {
        let text = std::fs::read_to_string(path).map_err(|source| PackError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let pack = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            ncm_entries = pack.ncm.len(),
            uf_entries = pack.uf.len(),
            "reference pack loaded"
        );
        Ok(pack)
    }
}
