//! Model configuration loaded from TOML.
//!
//! Every section is optional: missing tables and keys fall back to the
//! documented reference values, so a file only needs to name what it
//! overrides.
//!
//! ```toml
//! [kinetics]
//! mu_h = 6.0
//! hydrolysis_saturation = "multiplicative"
//!
//! [membrane]
//! clean_resistance = 5e11
//!
//! [membrane.cake]
//! model = "back_transport"
//! specific_cake_resistance = 1e12
//! back_transport_velocity = 6e-6
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    membrane::MembraneParameters,
    sludge::{KineticParameters, ParameterError, StoichiometricParameters},
};

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration")]
    Parameter(#[from] ParameterError),
}

/// All parameters of an MBR model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MbrConfig {
    pub kinetics: KineticParameters,
    pub stoichiometry: StoichiometricParameters,
    pub membrane: MembraneParameters,
}

impl MbrConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed input or unknown keys and
    /// [`ConfigError::Parameter`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading configuration from {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every parameter section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.kinetics.validate()?;
        self.stoichiometry.validate()?;
        self.membrane.validate()
    }
}
