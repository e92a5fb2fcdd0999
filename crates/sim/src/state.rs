use std::fmt;

use serde::{Deserialize, Serialize};

/// Pump control state. Exactly one is active at a time; only the
/// controller's transition function moves between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpState {
    #[default]
    Off,
    Starting,
    Operating,
    Fault,
    EmergencyScram,
    Resetting,
}

impl PumpState {
    pub const ALL: [PumpState; 6] = [
        PumpState::Off,
        PumpState::Starting,
        PumpState::Operating,
        PumpState::Fault,
        PumpState::EmergencyScram,
        PumpState::Resetting,
    ];

    /// States that are left on the very next tick regardless of command.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            PumpState::Starting | PumpState::Fault | PumpState::Resetting
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            PumpState::Off => "OFF",
            PumpState::Starting => "STARTING",
            PumpState::Operating => "OPERATING",
            PumpState::Fault => "FAULT DETECTED",
            PumpState::EmergencyScram => "EMERGENCY (SCRAM ACTIVE)",
            PumpState::Resetting => "RESETTING",
        }
    }
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
