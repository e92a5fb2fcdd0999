use std::collections::VecDeque;
use std::ops::ControlFlow;

use log::info;
use serde::Serialize;
use sim::{NoiseSource, PumpState, SeededNoise};

use crate::command::OperatorCommand;
use crate::controller::{PumpController, TickReport};

/// What the operator channel produced for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Command(OperatorCommand),
    Quit,
}

/// Where the driver gets operator input from. Called once per tick and
/// treated as instantaneous.
pub trait CommandSource {
    fn next_input(&mut self) -> Input;
}

/// Fixed command sequence, followed by `None` forever (or `Quit`).
#[derive(Clone, Debug, Default)]
pub struct Scripted {
    commands: VecDeque<OperatorCommand>,
    quit_when_exhausted: bool,
}

impl Scripted {
    pub fn new<I: IntoIterator<Item = OperatorCommand>>(commands: I) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            quit_when_exhausted: false,
        }
    }

    pub fn then_quit(mut self) -> Self {
        self.quit_when_exhausted = true;
        self
    }
}

impl CommandSource for Scripted {
    fn next_input(&mut self) -> Input {
        match self.commands.pop_front() {
            Some(cmd) => Input::Command(cmd),
            None if self.quit_when_exhausted => Input::Quit,
            None => Input::Command(OperatorCommand::None),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Iteration limit reached.
    Limit,
    /// Operator asked to quit.
    Quit,
    /// SCRAM entered with `stop_on_scram` set.
    Scram,
    /// Observer broke out of the loop.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_state: PumpState,
    pub scrams: u32,
    pub stop: StopReason,
}

/// Steps a controller with commands from a source until something tells it
/// to stop. Rendering and pacing belong to the observer passed to `run`.
pub struct Driver<S, N = SeededNoise> {
    controller: PumpController<N>,
    source: S,
    max_ticks: Option<u64>,
    stop_on_scram: bool,
}

impl<S: CommandSource, N: NoiseSource> Driver<S, N> {
    pub fn new(controller: PumpController<N>, source: S) -> Self {
        Self {
            controller,
            source,
            max_ticks: None,
            stop_on_scram: false,
        }
    }

    pub fn max_ticks(mut self, limit: u64) -> Self {
        self.max_ticks = Some(limit);
        self
    }

    pub fn stop_on_scram(mut self, stop: bool) -> Self {
        self.stop_on_scram = stop;
        self
    }

    pub fn run<F>(&mut self, mut observe: F) -> RunSummary
    where
        F: FnMut(&TickReport) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        let mut scrams = 0;

        let stop = loop {
            if self.max_ticks.is_some_and(|limit| ticks >= limit) {
                break StopReason::Limit;
            }
            let command = match self.source.next_input() {
                Input::Command(command) => command,
                Input::Quit => break StopReason::Quit,
            };

            let report = self.controller.tick(command);
            ticks += 1;

            let scrammed = report.step.scrammed();
            if scrammed {
                scrams += 1;
            }
            if observe(&report).is_break() {
                break StopReason::Cancelled;
            }
            if scrammed && self.stop_on_scram {
                break StopReason::Scram;
            }
        };

        let summary = RunSummary {
            ticks,
            final_state: self.controller.state(),
            scrams,
            stop,
        };
        info!(
            "run finished after {} ticks in {} ({:?})",
            summary.ticks, summary.final_state, summary.stop
        );
        summary
    }
}
