//! Walking settings

use crate::common::WalkError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Session-scoped walking configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    /// Baseline step length in meters, randomized per step
    pub default_step_length: f64,
    /// Configured walking speed in km/h
    pub walking_speed_kmh: f64,
    /// Nudge the speed randomly between steps
    pub use_walking_speed_variant: bool,
    /// Maximum deviation from the configured speed, km/h
    pub walking_speed_variant: f64,
}

impl Default for WalkSettings {
    fn default() -> Self {
        WalkSettings {
            default_step_length: 1.3,
            walking_speed_kmh: 4.16,
            use_walking_speed_variant: false,
            walking_speed_variant: 1.2,
        }
    }
}

impl WalkSettings {
    /// Load settings from a JSON file, missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let settings: WalkSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override settings from named parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), WalkError> {
        if let Some(&step_length) = params.get("default_step_length") {
            if step_length <= 0.0 {
                return Err(WalkError::Config("Step length must be positive".to_string()));
            }
            self.default_step_length = step_length;
        }

        if let Some(&speed) = params.get("walking_speed_kmh") {
            if speed <= 0.0 {
                return Err(WalkError::Config("Walking speed must be positive".to_string()));
            }
            self.walking_speed_kmh = speed;
        }

        if let Some(&toggle) = params.get("use_walking_speed_variant") {
            self.use_walking_speed_variant = toggle != 0.0;
        }

        if let Some(&variant) = params.get("walking_speed_variant") {
            if variant < 0.0 {
                return Err(WalkError::Config(
                    "Walking speed variant must be non-negative".to_string(),
                ));
            }
            self.walking_speed_variant = variant;
        }

        self.validate()
    }

    /// Check values that would stall or reverse a walk
    pub fn validate(&self) -> Result<(), WalkError> {
        if self.default_step_length <= 0.0 {
            return Err(WalkError::Config("Step length must be positive".to_string()));
        }
        if self.walking_speed_kmh <= 0.0 {
            return Err(WalkError::Config("Walking speed must be positive".to_string()));
        }
        if self.walking_speed_variant < 0.0 {
            return Err(WalkError::Config(
                "Walking speed variant must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
