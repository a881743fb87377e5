//! Tunable parameters for geometric bond inference.
//!
//! [`BondConfig`] can be built in code, deserialized from a TOML document, or loaded from a
//! file. Every construction path goes through [`BondConfig::validate`].

use crate::ops::error::Error;
use serde::Deserialize;
use std::path::Path;

/// Default upper distance (ångströms) at which two atoms are considered bonded.
pub const DEFAULT_MAX_BOND_LENGTH: f64 = 1.8;

/// Switches controlling the distance-based bond search.
///
/// ```toml
/// max_bond_length = 1.9
/// exclude_hydrogen_pairs = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BondConfig {
    /// Inclusive distance cutoff in ångströms.
    pub max_bond_length: f64,
    /// Never bond two hydrogens when `true`; hydrogens are then also skipped as search
    /// sources.
    pub exclude_hydrogen_pairs: bool,
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            max_bond_length: DEFAULT_MAX_BOND_LENGTH,
            exclude_hydrogen_pairs: true,
        }
    }
}

impl BondConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] on TOML syntax errors, unknown keys, or values
    /// rejected by [`BondConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::invalid_config(format!("malformed TOML: {}", e.message())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] when the file cannot be read, otherwise the same
    /// errors as [`BondConfig::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::io::Error::from_io(e, Some(path.to_path_buf())))?;
        Self::from_toml_str(&content)
    }

    /// Checks that the cutoff is a positive finite distance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the offending value.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_bond_length.is_finite() || self.max_bond_length <= 0.0 {
            return Err(Error::invalid_config(format!(
                "max_bond_length must be a positive finite distance, got {}",
                self.max_bond_length
            )));
        }
        Ok(())
    }
}
