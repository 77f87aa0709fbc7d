//! Engine configuration.
//!
//! Loaded from JSON by the CLI; every field has a default so an empty object
//! (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};

/// Default query horizon when the caller omits the window end.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Default cap on generated instances per recurring event and query.
pub const DEFAULT_MAX_OCCURRENCES: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Length of the default query window, counted from its start.
    #[serde(default = "default_horizon_months")]
    pub default_horizon_months: u32,
    /// Maximum number of instances one recurring event may contribute.
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: u16,
}

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

fn default_max_occurrences() -> u16 {
    DEFAULT_MAX_OCCURRENCES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_horizon_months: DEFAULT_HORIZON_MONTHS,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AgendaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_horizon_months == 0 {
            return Err(AgendaError::Config(
                "defaultHorizonMonths must be greater than zero".to_string(),
            ));
        }
        if self.max_occurrences == 0 {
            return Err(AgendaError::Config(
                "maxOccurrences must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

