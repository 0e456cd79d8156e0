//! Parser configuration
//!
//! Only policy knobs live here. The validity bounds for money and odometer
//! readings are invariants and stay constants in their extractors.

use crate::error::{ParserError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Transcripts longer than this many chars are truncated before parsing
    pub max_input_chars: usize,
    /// Floor for the estimated labor charge when no labor cost is stated
    pub min_labor_estimate: f64,
    /// Estimated labor as a share of the estimated parts subtotal
    pub labor_estimate_ratio: f64,
    /// Repair cost as a share of the part's replacement price
    pub repair_cost_ratio: f64,
    /// `parsed_successfully` requires confidence strictly above this
    pub success_threshold: f64,
    /// Max chars between an action keyword and a part keyword
    pub proximity_window: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 10_000,
            min_labor_estimate: 500.0,
            labor_estimate_ratio: 0.3,
            repair_cost_ratio: 0.5,
            success_threshold: 0.3,
            proximity_window: 60,
        }
    }
}

impl ParserConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ParserConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ParserError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_input_chars == 0 {
            return Err(ParserError::InvalidConfig(
                "max_input_chars must be positive".to_string(),
            ));
        }
        if self.proximity_window == 0 {
            return Err(ParserError::InvalidConfig(
                "proximity_window must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("labor_estimate_ratio", self.labor_estimate_ratio),
            ("repair_cost_ratio", self.repair_cost_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParserError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.success_threshold) {
            return Err(ParserError::InvalidConfig(format!(
                "success_threshold must be within [0, 1), got {}",
                self.success_threshold
            )));
        }
        if !self.min_labor_estimate.is_finite() || self.min_labor_estimate < 0.0 {
            return Err(ParserError::InvalidConfig(format!(
                "min_labor_estimate must be a non-negative number, got {}",
                self.min_labor_estimate
            )));
        }
        Ok(())
    }
}
