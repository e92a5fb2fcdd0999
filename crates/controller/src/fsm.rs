use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use sim::{PumpState, Readings};

use crate::command::OperatorCommand;

/// Values written into the readings at transition boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baselines {
    pub ambient_pressure: f64,
    pub ambient_temperature: f64,
    pub startup_pressure: f64,
    pub startup_temperature: f64,
    /// Decay heat left after a SCRAM.
    pub residual_temperature: f64,
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            ambient_pressure: 10.0,
            ambient_temperature: 25.0,
            startup_pressure: 100.0,
            startup_temperature: 150.0,
            residual_temperature: 80.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: PumpState,
    pub to: PumpState,
}

/// Successor of `state` for one tick.
///
/// | From           | Trigger            | To             |
/// |----------------|--------------------|----------------|
/// | Off            | Start              | Starting       |
/// | Starting       | always             | Operating      |
/// | Operating      | tripped            | Fault          |
/// | Operating      | Stop (not tripped) | Off            |
/// | Fault          | always             | EmergencyScram |
/// | EmergencyScram | Reset              | Resetting      |
/// | Resetting      | always             | Off            |
///
/// Anything else keeps the current state. `tripped` only matters while
/// `Operating`.
pub fn next_state(state: PumpState, command: OperatorCommand, tripped: bool) -> PumpState {
    use OperatorCommand as C;
    use PumpState as S;

    match (state, command) {
        (S::Off, C::Start) => S::Starting,
        (S::Off, _) => S::Off,
        (S::Starting, _) => S::Operating,
        (S::Operating, _) if tripped => S::Fault,
        (S::Operating, C::Stop) => S::Off,
        (S::Operating, _) => S::Operating,
        (S::Fault, _) => S::EmergencyScram,
        (S::EmergencyScram, C::Reset) => S::Resetting,
        (S::EmergencyScram, _) => S::EmergencyScram,
        (S::Resetting, _) => S::Off,
    }
}

/// The pump state machine. Owns the state and the readings; readings are
/// reset only as a side effect of the transitions that call for it.
#[derive(Clone, Debug)]
pub struct PumpFsm {
    state: PumpState,
    readings: Readings,
    baselines: Baselines,
}

impl PumpFsm {
    pub fn new(readings: Readings, baselines: Baselines) -> Self {
        Self::with_state(PumpState::Off, readings, baselines)
    }

    /// Start from an arbitrary state, e.g. to replay a scenario.
    pub fn with_state(state: PumpState, readings: Readings, baselines: Baselines) -> Self {
        Self {
            state,
            readings: readings.clamped(),
            baselines,
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub(crate) fn set_readings(&mut self, readings: Readings) {
        self.readings = readings;
    }

    /// Apply one command and safety verdict. Returns the transition taken,
    /// or `None` when the pair was a no-op.
    pub fn apply(&mut self, command: OperatorCommand, tripped: bool) -> Option<Transition> {
        let from = self.state;
        let to = next_state(from, command, tripped);
        if to == from {
            if command != OperatorCommand::None {
                debug!("command {command} has no effect in {from}");
            }
            return None;
        }

        self.state = to;
        self.enter(from, to);
        info!("transition {from} -> {to}");
        Some(Transition { from, to })
    }

    fn enter(&mut self, from: PumpState, to: PumpState) {
        let b = self.baselines;
        match (from, to) {
            (PumpState::Off, PumpState::Starting) => {
                self.readings.pressure = b.startup_pressure;
                self.readings.temperature = b.startup_temperature;
            }
            (PumpState::Operating, PumpState::Off) | (PumpState::Resetting, PumpState::Off) => {
                self.readings.pressure = b.ambient_pressure;
                self.readings.temperature = b.ambient_temperature;
            }
            (PumpState::Fault, PumpState::EmergencyScram) => {
                self.readings.pressure = 0.0;
                self.readings.temperature = b.residual_temperature;
                error!("SCRAM: rods inserted, primary pumps tripped, manual reset required");
            }
            _ => {}
        }
        self.readings.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fsm_in(state: PumpState) -> PumpFsm {
        let readings = Readings {
            pressure: 155.0,
            temperature: 310.0,
            water_level: 95.0,
        };
        PumpFsm::with_state(state, readings, Baselines::default())
    }

    #[test]
    fn transition_table_is_total() {
        // Every (state, command, tripped) triple has exactly one successor,
        // and it is one of the table's rows or the state itself.
        for state in PumpState::ALL {
            for command in OperatorCommand::ALL {
                for tripped in [false, true] {
                    let to = next_state(state, command, tripped);
                    let expected = match (state, command, tripped) {
                        (PumpState::Off, OperatorCommand::Start, _) => PumpState::Starting,
                        (PumpState::Starting, _, _) => PumpState::Operating,
                        (PumpState::Operating, _, true) => PumpState::Fault,
                        (PumpState::Operating, OperatorCommand::Stop, false) => PumpState::Off,
                        (PumpState::Fault, _, _) => PumpState::EmergencyScram,
                        (PumpState::EmergencyScram, OperatorCommand::Reset, _) => {
                            PumpState::Resetting
                        }
                        (PumpState::Resetting, _, _) => PumpState::Off,
                        _ => state,
                    };
                    assert_eq!(to, expected, "{state:?} / {command:?} / {tripped}");
                }
            }
        }
    }

    #[test]
    fn transient_states_ignore_commands() {
        for state in PumpState::ALL.into_iter().filter(|s| s.is_transient()) {
            let outcomes: Vec<_> = OperatorCommand::ALL
                .iter()
                .map(|&c| next_state(state, c, false))
                .collect();
            assert!(outcomes.iter().all(|&s| s == outcomes[0]));
            assert_ne!(outcomes[0], state);
        }
    }

    #[test]
    fn start_sets_startup_baseline() {
        let mut fsm = PumpFsm::new(Readings::default(), Baselines::default());
        let t = fsm.apply(OperatorCommand::Start, false);
        assert_eq!(
            t,
            Some(Transition {
                from: PumpState::Off,
                to: PumpState::Starting
            })
        );
        assert_eq!(fsm.readings().pressure, 100.0);
        assert_eq!(fsm.readings().temperature, 150.0);
    }

    #[test]
    fn starting_advances_without_touching_readings() {
        let mut fsm = fsm_in(PumpState::Starting);
        let before = fsm.readings();
        fsm.apply(OperatorCommand::Stop, false);
        assert_eq!(fsm.state(), PumpState::Operating);
        assert_eq!(fsm.readings(), before);
    }

    #[test]
    fn trip_beats_stop() {
        let mut fsm = fsm_in(PumpState::Operating);
        let before = fsm.readings();
        fsm.apply(OperatorCommand::Stop, true);
        assert_eq!(fsm.state(), PumpState::Fault);
        assert_eq!(fsm.readings(), before);
    }

    #[test]
    fn stop_returns_to_ambient() {
        let mut fsm = fsm_in(PumpState::Operating);
        fsm.apply(OperatorCommand::Stop, false);
        assert_eq!(fsm.state(), PumpState::Off);
        assert_eq!(fsm.readings().pressure, 10.0);
        assert_eq!(fsm.readings().temperature, 25.0);
        assert_eq!(fsm.readings().water_level, 95.0);
    }

    #[test]
    fn stop_while_off_is_a_no_op() {
        let mut fsm = PumpFsm::new(Readings::default(), Baselines::default());
        let before = fsm.readings();
        assert_eq!(fsm.apply(OperatorCommand::Stop, false), None);
        assert_eq!(fsm.state(), PumpState::Off);
        assert_eq!(fsm.readings(), before);
    }

    #[test]
    fn scram_zeroes_pressure() {
        let mut fsm = fsm_in(PumpState::Fault);
        fsm.apply(OperatorCommand::Start, false);
        assert_eq!(fsm.state(), PumpState::EmergencyScram);
        assert_eq!(fsm.readings().pressure, 0.0);
        assert_eq!(fsm.readings().temperature, 80.0);
    }

    #[test]
    fn scram_only_exits_on_reset() {
        let mut fsm = fsm_in(PumpState::EmergencyScram);
        for command in [OperatorCommand::None, OperatorCommand::Start, OperatorCommand::Stop] {
            for tripped in [false, true] {
                assert_eq!(fsm.apply(command, tripped), None);
                assert_eq!(fsm.state(), PumpState::EmergencyScram);
            }
        }
        fsm.apply(OperatorCommand::Reset, false);
        assert_eq!(fsm.state(), PumpState::Resetting);
        fsm.apply(OperatorCommand::Start, false);
        assert_eq!(fsm.state(), PumpState::Off);
        assert_eq!(fsm.readings().pressure, 10.0);
        assert_eq!(fsm.readings().temperature, 25.0);
    }
}
