//! # icmsst-pack — Reference Packs
//!
//! Static lookup tables consumed read-only by the pricing layer:
//!
//! - **NCM catalog** ([`ncm`]): tax-classification codes with a description,
//!   the original MVA percent used for ICMS-ST, and an optional CEST code.
//!
//! - **UF table** ([`uf`]): the 27 Brazilian federative units with their
//!   internal ICMS rates.
//!
//! ## Loading
//!
//! [`ReferencePack::builtin`] returns a process-wide pack built once on first
//! access and never mutated afterwards. Operators may replace it at startup
//! with a YAML pack via [`ReferencePack::from_yaml_str`] or
//! [`ReferencePack::from_path`]; the loaded pack is then shared immutably.

pub mod error;
pub mod ncm;
pub mod pack;
pub mod uf;

pub use error::PackError;
pub use ncm::{NcmCatalog, NcmEntry};
pub use pack::ReferencePack;
pub use uf::{UfEntry, UfTable};
