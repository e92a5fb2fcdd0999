use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::{NoiseSource, SeededNoise};
use crate::readings::{Parameter, Readings};
use crate::state::PumpState;

/// Per-channel perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    /// Half-width of the uniform delta.
    pub amplitude: f64,
    /// Operating point the channel settles around while `Operating`.
    /// `None` means a plain random walk.
    #[serde(default)]
    pub nominal: Option<f64>,
}

impl Drift {
    pub fn walk(amplitude: f64) -> Self {
        Self {
            amplitude,
            nominal: None,
        }
    }

    pub fn around(nominal: f64, amplitude: f64) -> Self {
        Self {
            amplitude,
            nominal: Some(nominal),
        }
    }
}

/// Fault injection used to exercise the SCRAM path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyParams {
    /// Chance per `Operating` tick.
    pub probability: f64,
    pub low_pressure: f64,
    pub high_temperature: f64,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self {
            probability: 0.15,
            low_pressure: 145.0,
            high_temperature: 335.0,
        }
    }
}

impl AnomalyParams {
    pub fn disabled() -> Self {
        Self {
            probability: 0.0,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub pressure: Drift,
    pub temperature: Drift,
    pub water_level: Drift,
    pub anomaly: AnomalyParams,
}

impl Default for ModelParams {
    /// Pump loop: pressure around 155 ± 2 bar, coolant around 310 ± 5 °C.
    fn default() -> Self {
        Self {
            pressure: Drift::around(155.0, 2.0),
            temperature: Drift::around(310.0, 5.0),
            water_level: Drift::walk(1.0),
            anomaly: AnomalyParams::default(),
        }
    }
}

impl ModelParams {
    /// Unanchored random walk on every channel with no fault injection.
    pub fn random_walk() -> Self {
        Self {
            pressure: Drift::walk(1.5),
            temperature: Drift::walk(2.5),
            water_level: Drift::walk(1.0),
            anomaly: AnomalyParams::disabled(),
        }
    }

    pub fn drift(&self, parameter: Parameter) -> Drift {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Pressure => self.pressure,
            Parameter::WaterLevel => self.water_level,
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        for parameter in Parameter::ALL {
            let drift = self.drift(parameter);
            if !drift.amplitude.is_finite() || drift.amplitude < 0.0 {
                return Err(ParamsError::Amplitude {
                    parameter,
                    value: drift.amplitude,
                });
            }
            if let Some(nominal) = drift.nominal {
                if !nominal.is_finite() {
                    return Err(ParamsError::Nominal {
                        parameter,
                        value: nominal,
                    });
                }
            }
        }

        let a = &self.anomaly;
        if !(0.0..=1.0).contains(&a.probability) {
            return Err(ParamsError::Probability(a.probability));
        }
        if !a.low_pressure.is_finite() {
            return Err(ParamsError::Override {
                parameter: Parameter::Pressure,
                value: a.low_pressure,
            });
        }
        if !a.high_temperature.is_finite() {
            return Err(ParamsError::Override {
                parameter: Parameter::Temperature,
                value: a.high_temperature,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("drift amplitude for {parameter} must be finite and non-negative (got {value})")]
    Amplitude { parameter: Parameter, value: f64 },

    #[error("nominal {parameter} must be finite (got {value})")]
    Nominal { parameter: Parameter, value: f64 },

    #[error("anomaly probability must be within [0, 1] (got {0})")]
    Probability(f64),

    #[error("anomaly override for {parameter} must be finite (got {value})")]
    Override { parameter: Parameter, value: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    LowPressure,
    HighTemperature,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    pub readings: Readings,
    pub anomaly: Option<Anomaly>,
}

/// Drifts the readings once per tick.
///
/// Only `Operating` perturbs anything. `Starting` holds the startup
/// baseline the controller just wrote, and every other state returns the
/// readings untouched (apart from clamping).
#[derive(Clone, Debug)]
pub struct ParameterModel<N = SeededNoise> {
    params: ModelParams,
    noise: N,
}

impl ParameterModel<SeededNoise> {
    pub fn seeded(params: ModelParams, seed: u64) -> Self {
        Self::new(params, SeededNoise::new(seed))
    }
}

impl<N: NoiseSource> ParameterModel<N> {
    pub fn new(params: ModelParams, noise: N) -> Self {
        Self { params, noise }
    }

    /// Advance `readings` one tick for a pump in `state`.
    ///
    /// Draw order while `Operating`: anomaly roll, channel coin (only when
    /// the roll hits), then one jitter per channel in diagnostic order.
    pub fn advance(&mut self, readings: Readings, state: PumpState) -> Advance {
        let mut next = readings;
        let mut anomaly = None;

        match state {
            PumpState::Operating => {
                let a = self.params.anomaly;
                if self.noise.chance(a.probability) {
                    anomaly = Some(if self.noise.chance(0.5) {
                        Anomaly::LowPressure
                    } else {
                        Anomaly::HighTemperature
                    });
                }

                for parameter in Parameter::ALL {
                    let drift = self.params.drift(parameter);
                    let delta = self.noise.jitter(drift.amplitude);
                    let v = match drift.nominal {
                        Some(nominal) => nominal + delta,
                        None => next.get(parameter) + delta,
                    };
                    next.set(parameter, v);
                }

                if let Some(kind) = anomaly {
                    match kind {
                        Anomaly::LowPressure => next.pressure = a.low_pressure,
                        Anomaly::HighTemperature => next.temperature = a.high_temperature,
                    }
                    debug!("injected anomaly {kind:?}");
                }
            }
            PumpState::Off
            | PumpState::Starting
            | PumpState::Fault
            | PumpState::EmergencyScram
            | PumpState::Resetting => {}
        }

        next.clamp();
        Advance {
            readings: next,
            anomaly,
        }
    }
}
