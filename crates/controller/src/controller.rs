use log::warn;
use safety::{Thresholds, Violation};
use serde::Serialize;
use sim::{Anomaly, NoiseSource, ParameterModel, PumpState, Readings, SeededNoise};

use crate::command::OperatorCommand;
use crate::config::{ConfigError, ControllerConfig};
use crate::fsm::{PumpFsm, Transition};

/// Result of one pass through [`tick`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub state: PumpState,
    pub readings: Readings,
    /// Empty unless the pump was `Operating` when the tick began.
    pub violations: Vec<Violation>,
    pub transition: Option<Transition>,
    pub anomaly: Option<Anomaly>,
}

impl Step {
    pub fn violated(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.parameter.name()).collect()
    }

    /// This tick entered `EmergencyScram`.
    pub fn scrammed(&self) -> bool {
        self.transition.is_some_and(|t| t.to == PumpState::EmergencyScram)
    }
}

/// Run one tick in strict order: safety check (only while `Operating`),
/// transition, then the parameter model on the post-transition state.
pub fn tick<N: NoiseSource>(
    fsm: &mut PumpFsm,
    model: &mut ParameterModel<N>,
    command: OperatorCommand,
    thresholds: &Thresholds,
) -> Step {
    let violations = if fsm.state() == PumpState::Operating {
        safety::evaluate(&fsm.readings(), thresholds).violations
    } else {
        Vec::new()
    };
    for v in &violations {
        warn!("safety violation: {v}");
    }

    let transition = fsm.apply(command, !violations.is_empty());

    let advance = model.advance(fsm.readings(), fsm.state());
    fsm.set_readings(advance.readings);

    Step {
        state: fsm.state(),
        readings: advance.readings,
        violations,
        transition,
        anomaly: advance.anomaly,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub command: OperatorCommand,
    #[serde(flatten)]
    pub step: Step,
}

/// A pump FSM together with the model and thresholds it is stepped with.
#[derive(Clone, Debug)]
pub struct PumpController<N = SeededNoise> {
    fsm: PumpFsm,
    model: ParameterModel<N>,
    thresholds: Thresholds,
    ticks: u64,
}

impl PumpController<SeededNoise> {
    pub fn seeded(config: &ControllerConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, SeededNoise::new(seed))
    }
}

impl<N: NoiseSource> PumpController<N> {
    pub fn new(config: &ControllerConfig, noise: N) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(
            PumpFsm::new(config.initial, config.baselines),
            ParameterModel::new(config.model, noise),
            config.thresholds,
        ))
    }

    pub fn from_parts(fsm: PumpFsm, model: ParameterModel<N>, thresholds: Thresholds) -> Self {
        Self {
            fsm,
            model,
            thresholds,
            ticks: 0,
        }
    }

    pub fn state(&self) -> PumpState {
        self.fsm.state()
    }

    pub fn readings(&self) -> Readings {
        self.fsm.readings()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, command: OperatorCommand) -> TickReport {
        let step = tick(&mut self.fsm, &mut self.model, command, &self.thresholds);
        self.ticks += 1;
        TickReport {
            tick: self.ticks,
            command,
            step,
        }
    }
}
