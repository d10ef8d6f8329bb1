//! Conversion settings.
//!
//! Settings can be built in code or read from JSON:
//!
//! ```json
//! { "from": "RDF", "to": "RUB", "antialiased": true }
//! ```
//!
//! Every field is optional. Unknown coordinate tokens resolve to
//! `UNSPECIFIED`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use splat_math::CoordinateSystem;
use thiserror::Error;

/// Errors that can occur while reading a conversion config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Target coordinate system must be specified")]
    UnspecifiedTarget,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How a scene should be converted between files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Convention of the input data; `UNSPECIFIED` uses the input format's own
    pub from: CoordinateSystem,

    /// Convention the scene is converted to before saving
    pub to: CoordinateSystem,

    /// Mark the output as antialiased
    pub antialiased: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            from: CoordinateSystem::Unspecified,
            to: CoordinateSystem::Rub,
            antialiased: false,
        }
    }
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: CoordinateSystem) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: CoordinateSystem) -> Self {
        self.to = to;
        self
    }

    pub fn with_antialiased(mut self, antialiased: bool) -> Self {
        self.antialiased = antialiased;
        self
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the config as pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the config describes a usable conversion.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.to.is_specified() {
            return Err(ConfigError::UnspecifiedTarget);
        }
        Ok(())
    }
}
