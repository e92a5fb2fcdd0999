use safety::Thresholds;
use serde::{Deserialize, Serialize};
use sim::{ModelParams, Readings};
use thiserror::Error;

use crate::fsm::Baselines;

/// Everything a controller needs besides its noise source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub thresholds: Thresholds,
    pub baselines: Baselines,
    pub model: ModelParams,
    pub initial: Readings,
}

impl ControllerConfig {
    /// Primary pump loop in bar / °C with dual-band trips and fault
    /// injection. Same as `Default`.
    pub fn pump() -> Self {
        Self::default()
    }

    /// Single-tier SCRAM monitor in MPa / °C / % with an unanchored random
    /// walk and no fault injection.
    pub fn monitor() -> Self {
        Self {
            thresholds: Thresholds::single_tier(),
            baselines: Baselines {
                ambient_pressure: 0.1,
                ambient_temperature: 25.0,
                startup_pressure: 12.0,
                startup_temperature: 300.0,
                residual_temperature: 80.0,
            },
            model: ModelParams::random_walk(),
            initial: Readings {
                pressure: 0.1,
                temperature: 25.0,
                water_level: 95.0,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.model.validate()?;

        let b = &self.baselines;
        let baselines = [
            ("ambient_pressure", b.ambient_pressure),
            ("ambient_temperature", b.ambient_temperature),
            ("startup_pressure", b.startup_pressure),
            ("startup_temperature", b.startup_temperature),
            ("residual_temperature", b.residual_temperature),
        ];
        for (name, value) in baselines {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Baseline { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Thresholds(#[from] safety::ConfigError),

    #[error(transparent)]
    Model(#[from] sim::ParamsError),

    #[error("baseline {name} must be finite and non-negative (got {value})")]
    Baseline { name: &'static str, value: f64 },
}
