//! Plant side of the pump loop: the readings, the pump state vocabulary
//! shared by every crate, and the parameter model that drifts the readings
//! between ticks.

mod model;
mod noise;
mod readings;
mod state;

pub use model::{Advance, Anomaly, AnomalyParams, Drift, ModelParams, ParameterModel, ParamsError};
pub use noise::{NoiseSource, SeededNoise};
pub use readings::{Parameter, Readings};
pub use state::PumpState;
