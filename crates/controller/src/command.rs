use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operator input for one tick. Consumed by the transition function and
/// never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCommand {
    #[default]
    None,
    Start,
    Stop,
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized operator command {0:?}")]
pub struct ParseCommandError(pub String);

impl OperatorCommand {
    pub const ALL: [OperatorCommand; 4] = [
        OperatorCommand::None,
        OperatorCommand::Start,
        OperatorCommand::Stop,
        OperatorCommand::Reset,
    ];

    /// Boundary normalisation: anything unrecognised is inaction.
    pub fn normalize(raw: &str) -> Self {
        raw.parse::<OperatorCommand>().unwrap_or_else(|e: ParseCommandError| {
            debug!("{e}, treating as no command");
            OperatorCommand::None
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            OperatorCommand::None => "none",
            OperatorCommand::Start => "start",
            OperatorCommand::Stop => "stop",
            OperatorCommand::Reset => "reset",
        }
    }
}

impl FromStr for OperatorCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(OperatorCommand::None),
            "start" => Ok(OperatorCommand::Start),
            "stop" => Ok(OperatorCommand::Stop),
            "reset" => Ok(OperatorCommand::Reset),
            _ => Err(ParseCommandError(s.to_string())),
        }
    }
}

impl fmt::Display for OperatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!("start".parse(), Ok(OperatorCommand::Start));
        assert_eq!("  STOP\n".parse(), Ok(OperatorCommand::Stop));
        assert_eq!("Reset".parse(), Ok(OperatorCommand::Reset));
        assert_eq!("".parse(), Ok(OperatorCommand::None));
        assert_eq!(
            "launch".parse::<OperatorCommand>(),
            Err(ParseCommandError("launch".to_string()))
        );
    }

    #[test]
    fn unknown_text_normalizes_to_none() {
        assert_eq!(OperatorCommand::normalize("launch"), OperatorCommand::None);
        assert_eq!(OperatorCommand::normalize("start please"), OperatorCommand::None);
        assert_eq!(OperatorCommand::normalize("start"), OperatorCommand::Start);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for cmd in OperatorCommand::ALL {
            assert_eq!(cmd.to_string().parse(), Ok(cmd));
        }
    }
}
