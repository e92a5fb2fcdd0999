//! Safety threshold evaluation.
//!
//! [`evaluate`] is pure: the same readings and thresholds always produce the
//! same verdict, with violations listed in diagnostic order (temperature,
//! pressure, water level). Limits are exclusive: a reading exactly on a
//! limit is safe.

use std::fmt;

use serde::{Deserialize, Serialize};
use sim::{Parameter, Readings};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Trip above a maximum temperature or pressure, or below a minimum
    /// water level.
    SingleTier,
    /// Pressure and temperature must both stay inside their operating band.
    #[default]
    DualBand,
}

/// Closed interval `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v <= self.high
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub profile: Profile,
    pub max_temperature: f64,
    pub max_pressure: f64,
    pub min_water_level: f64,
    pub operating_band_pressure: Band,
    pub operating_band_temperature: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            profile: Profile::DualBand,
            max_temperature: 350.0,
            max_pressure: 15.5,
            min_water_level: 90.0,
            operating_band_pressure: Band::new(150.0, 160.0),
            operating_band_temperature: Band::new(290.0, 325.0),
        }
    }
}

impl Thresholds {
    pub fn single_tier() -> Self {
        Self {
            profile: Profile::SingleTier,
            ..Default::default()
        }
    }

    pub fn dual_band() -> Self {
        Self {
            profile: Profile::DualBand,
            ..Default::default()
        }
    }

    /// Upper display limit for a parameter under the active profile.
    pub fn scale(&self, parameter: Parameter) -> f64 {
        match (self.profile, parameter) {
            (_, Parameter::WaterLevel) => 100.0,
            (Profile::SingleTier, Parameter::Temperature) => self.max_temperature,
            (Profile::SingleTier, Parameter::Pressure) => self.max_pressure,
            (Profile::DualBand, Parameter::Temperature) => self.operating_band_temperature.high,
            (Profile::DualBand, Parameter::Pressure) => self.operating_band_pressure.high,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_temperature", self.max_temperature),
            ("max_pressure", self.max_pressure),
            ("min_water_level", self.min_water_level),
        ];
        for (name, value) in limits {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        let bands = [
            ("operating_band_pressure", self.operating_band_pressure),
            ("operating_band_temperature", self.operating_band_temperature),
        ];
        for (name, band) in bands {
            if !band.low.is_finite() || !band.high.is_finite() {
                return Err(ConfigError::NonFinite {
                    name,
                    value: if band.low.is_finite() { band.high } else { band.low },
                });
            }
            if band.low > band.high {
                return Err(ConfigError::InvertedBand {
                    name,
                    low: band.low,
                    high: band.high,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold {name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },

    #[error("band {name} is inverted: low {low} > high {high}")]
    InvertedBand {
        name: &'static str,
        low: f64,
        high: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Above,
    Below,
}

/// One violated threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub parameter: Parameter,
    pub bound: Bound,
    pub value: f64,
    pub limit: f64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.bound {
            Bound::Above => '>',
            Bound::Below => '<',
        };
        write!(
            f,
            "{} critical ({:.1} {} {:.1})",
            self.parameter, self.value, op, self.limit
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Verdict {
    pub violations: Vec<Violation>,
}

impl Verdict {
    pub fn safe() -> Self {
        Self::default()
    }

    pub fn is_unsafe(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.parameter.name()).collect()
    }
}

fn above(parameter: Parameter, value: f64, limit: f64) -> Option<Violation> {
    (value > limit).then_some(Violation {
        parameter,
        bound: Bound::Above,
        value,
        limit,
    })
}

fn below(parameter: Parameter, value: f64, limit: f64) -> Option<Violation> {
    (value < limit).then_some(Violation {
        parameter,
        bound: Bound::Below,
        value,
        limit,
    })
}

fn outside(parameter: Parameter, value: f64, band: Band) -> Option<Violation> {
    if band.contains(value) {
        return None;
    }
    below(parameter, value, band.low).or_else(|| above(parameter, value, band.high))
}

/// Evaluate `readings` under the profile selected in `thresholds`.
pub fn evaluate(readings: &Readings, thresholds: &Thresholds) -> Verdict {
    match thresholds.profile {
        Profile::SingleTier => single_tier(readings, thresholds),
        Profile::DualBand => dual_band(readings, thresholds),
    }
}

/// Any one of: temperature above max, pressure above max, water level
/// below min.
pub fn single_tier(readings: &Readings, thresholds: &Thresholds) -> Verdict {
    let violations = [
        above(Parameter::Temperature, readings.temperature, thresholds.max_temperature),
        above(Parameter::Pressure, readings.pressure, thresholds.max_pressure),
        below(Parameter::WaterLevel, readings.water_level, thresholds.min_water_level),
    ];
    Verdict {
        violations: violations.into_iter().flatten().collect(),
    }
}

/// Temperature or pressure outside its operating band. Water level is not
/// part of this profile.
pub fn dual_band(readings: &Readings, thresholds: &Thresholds) -> Verdict {
    let violations = [
        outside(
            Parameter::Temperature,
            readings.temperature,
            thresholds.operating_band_temperature,
        ),
        outside(
            Parameter::Pressure,
            readings.pressure,
            thresholds.operating_band_pressure,
        ),
    ];
    Verdict {
        violations: violations.into_iter().flatten().collect(),
    }
}
