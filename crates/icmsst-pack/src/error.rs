//! Pack-specific error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a reference pack.
#[derive(Debug, Error)]
pub enum PackError {
    /// YAML parsing failed.
    #[error("failed to parse reference pack YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A pack file could not be read.
    #[error("failed to read reference pack at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The same code appears twice in one table.
    #[error("duplicate {table} code in reference pack: {code}")]
    DuplicateCode { table: &'static str, code: String },

    /// A table that must not be empty has no rows.
    #[error("reference pack {table} table is empty")]
    EmptyTable { table: &'static str },

    /// A row carries a value outside its allowed range.
    #[error("invalid {table} entry {code}: {reason}")]
    InvalidEntry {
        table: &'static str,
        code: String,
        reason: String,
    },
}
