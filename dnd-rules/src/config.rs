//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! [point_buy]
//! submission = "require_full_budget"
//!
//! [derivation]
//! default_hit_die = 8
//!
//! [reference]
//! catalog = "races_and_classes.toml"
//! ```
//!
//! Every section and key is optional.

use crate::derivation::{StatCalculator, DEFAULT_HIT_DIE};
use crate::error::{ConfigError, RulesError};
use crate::point_buy::SubmissionPolicy;
use crate::reference::{ReferenceCatalog, ReferenceData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointBuyConfig {
    pub submission: SubmissionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Hit die for classes missing from the reference data.
    pub default_hit_die: u32,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            default_hit_die: DEFAULT_HIT_DIE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Race/class catalog file. Relative paths resolve against the config
    /// file's directory. The built-in SRD catalog is used when unset.
    pub catalog: Option<PathBuf>,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub point_buy: PointBuyConfig,
    pub derivation: DerivationConfig,
    pub reference: ReferenceConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load a config file, resolving a relative catalog path against it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let (Some(catalog), Some(dir)) = (config.reference.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }

        tracing::debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    fn check(&self) -> Result<(), RulesError> {
        match self.derivation.default_hit_die {
            4 | 6 | 8 | 10 | 12 => Ok(()),
            other => Err(RulesError::malformed(format!(
                "derivation.default_hit_die must be 4, 6, 8, 10 or 12, got {other}"
            ))),
        }
    }

    /// The configured catalog, or the built-in SRD one.
    pub fn reference_catalog(&self) -> Result<ReferenceCatalog, ConfigError> {
        match &self.reference.catalog {
            Some(path) => ReferenceCatalog::load(path),
            None => Ok(ReferenceCatalog::srd().clone()),
        }
    }

    /// A stat calculator honoring the configured fallback hit die.
    pub fn stat_calculator<'a, R: ReferenceData + ?Sized>(
        &self,
        reference: &'a R,
    ) -> StatCalculator<'a, R> {
        StatCalculator::new(reference).with_default_hit_die(self.derivation.default_hit_die)
    }
}
