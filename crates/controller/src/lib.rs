//! Pump control state machine and the loop that drives it.

mod command;
mod config;
mod controller;
mod driver;
mod fsm;

pub use command::{OperatorCommand, ParseCommandError};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{tick, PumpController, Step, TickReport};
pub use driver::{CommandSource, Driver, Input, RunSummary, Scripted, StopReason};
pub use fsm::{next_state, Baselines, PumpFsm, Transition};
pub use sim::PumpState;
