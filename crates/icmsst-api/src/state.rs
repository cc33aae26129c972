//! # Application State
//!
//! Shared, read-only state passed to every handler through the `State`
//! extractor: the reference pack and the pricing profile. Both are loaded
//! once at startup and never mutated, so handlers share them through `Arc`
//! without locking.

use std::path::PathBuf;
use std::sync::Arc;

use icmsst_pack::{PackError, ReferencePack};
use icmsst_pricing::{PricingProfile, ProfileError, Simulator};
use thiserror::Error;

/// Server configuration, read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Pricing profile YAML. Defaults apply when absent.
    pub profile_path: Option<PathBuf>,
    /// Reference pack YAML replacing the built-in one.
    pub pack_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |p: &Option<PathBuf>| match p {
            Some(path) => path.display().to_string(),
            None => "<built-in>".to_string(),
        };
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("profile", &describe(&self.profile_path))
            .field("reference_pack", &describe(&self.pack_path))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            profile_path: None,
            pack_path: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `ICMSST_PROFILE` and `ICMSST_REFERENCE_PACK`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = match get("PORT") {
            Some(raw) => match raw.trim().parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(value = %raw, "PORT is not a valid port number, using 8080");
                    8080
                }
            },
            None => 8080,
        };
        Self {
            port,
            profile_path: get("ICMSST_PROFILE").map(PathBuf::from),
            pack_path: get("ICMSST_REFERENCE_PACK").map(PathBuf::from),
        }
    }
}

/// Startup failed loading a configured file.
#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pack: Arc<ReferencePack>,
    pub profile: Arc<PricingProfile>,
}

impl AppState {
    /// Built-in reference pack and default profile.
    pub fn new() -> Self {
        Self::with_parts(
            AppConfig::default(),
            ReferencePack::builtin().clone(),
            PricingProfile::default(),
        )
    }

    pub fn with_parts(config: AppConfig, pack: ReferencePack, profile: PricingProfile) -> Self {
        Self {
            config,
            pack: Arc::new(pack),
            profile: Arc::new(profile),
        }
    }

    /// Load the files named in `config`, falling back to built-ins.
    pub fn try_from_config(config: AppConfig) -> Result<Self, StateError> {
        let pack = match &config.pack_path {
            Some(path) => ReferencePack::from_path(path)?,
            None => ReferencePack::builtin().clone(),
        };
        let profile = match &config.profile_path {
            Some(path) => PricingProfile::from_path(path)?,
            None => PricingProfile::default(),
        };
        Ok(Self::with_parts(config, pack, profile))
    }

    pub fn simulator(&self) -> Simulator<'_> {
        Simulator::new(&self.pack, &self.profile)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
