use std::fmt;

use serde::{Deserialize, Serialize};

/// A monitored physical quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    Pressure,
    WaterLevel,
}

impl Parameter {
    /// Diagnostic reporting order.
    pub const ALL: [Parameter; 3] = [
        Parameter::Temperature,
        Parameter::Pressure,
        Parameter::WaterLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Pressure => "pressure",
            Parameter::WaterLevel => "water_level",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Current physical readings of the primary circuit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Readings {
    pub pressure: f64,
    pub temperature: f64,
    /// Percent, 0..=100
    pub water_level: f64,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            pressure: 10.0,
            temperature: 25.0,
            water_level: 95.0,
        }
    }
}

impl Readings {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Pressure => self.pressure,
            Parameter::WaterLevel => self.water_level,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: f64) {
        match parameter {
            Parameter::Temperature => self.temperature = value,
            Parameter::Pressure => self.pressure = value,
            Parameter::WaterLevel => self.water_level = value,
        }
    }

    /// Pull every reading back inside its physical bounds.
    /// NaN collapses to the lower bound.
    pub fn clamp(&mut self) {
        self.pressure = non_negative(self.pressure);
        self.temperature = non_negative(self.temperature);
        self.water_level = if self.water_level.is_nan() {
            0.0
        } else {
            self.water_level.clamp(0.0, 100.0)
        };
    }

    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }
}

fn non_negative(v: f64) -> f64 {
    // f64::max returns the non-NaN operand
    v.max(0.0)
}
