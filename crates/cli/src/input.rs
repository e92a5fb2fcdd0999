use std::io::{self, BufRead, Write};

use controller::{CommandSource, Input, OperatorCommand};
use log::warn;

/// One operator line per tick. `quit`/`exit` or end of input stops the
/// run; anything unrecognised is no command.
pub struct LineSource<R> {
    lines: io::Lines<R>,
    prompt: bool,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, prompt: bool) -> Self {
        Self {
            lines: reader.lines(),
            prompt,
        }
    }
}

impl<R: BufRead> CommandSource for LineSource<R> {
    fn next_input(&mut self) -> Input {
        if self.prompt {
            eprint!("command (start/stop/reset/quit)> ");
            let _ = io::stderr().flush();
        }
        match self.lines.next() {
            Some(Ok(line)) => match line.trim().to_ascii_lowercase().as_str() {
                "quit" | "exit" => Input::Quit,
                raw => Input::Command(OperatorCommand::normalize(raw)),
            },
            Some(Err(e)) => {
                warn!("failed to read operator input: {e}");
                Input::Quit
            }
            None => Input::Quit,
        }
    }
}
