//! Line commands for the console front end

use gantrykit_core::{Direction, JogLog, LogEntry, UnknownDirection};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  press <dir>     start jogging (upleft up upright left right downleft down downright)
  release <dir>   stop jogging
  w a s d         toggle jogging up, left, down, right
  step <n>        set the step size
  reconnect       close the link and connect again
  status          show link state, step, and held directions
  stop            release every direction
  quit            stop everything and exit";

/// Console input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Direction(#[from] UnknownDirection),
}

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Press(Direction),
    Release(Direction),
    /// Toggle the direction bound to a WASD key
    Toggle(Direction),
    /// Raw step text; invalid input falls back to 1 when applied
    Step(String),
    Reconnect,
    Status,
    Stop,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        if let [key] = command.as_bytes() {
            if let Some(direction) = Direction::from_key(char::from(*key)) {
                return Ok(Self::Toggle(direction));
            }
        }

        match command.as_str() {
            "press" => Ok(Self::Press(
                argument.ok_or(ConsoleError::MissingArgument("press"))?.parse()?,
            )),
            "release" => Ok(Self::Release(
                argument.ok_or(ConsoleError::MissingArgument("release"))?.parse()?,
            )),
            "step" => Ok(Self::Step(
                argument.ok_or(ConsoleError::MissingArgument("step"))?.to_string(),
            )),
            "reconnect" => Ok(Self::Reconnect),
            "status" => Ok(Self::Status),
            "stop" => Ok(Self::Stop),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(ConsoleError::UnknownCommand(command)),
        }
    }
}

/// Turns a live log subscription into a gap-free, in-order stream.
///
/// Entries a lagging subscription skipped are recovered from the retained
/// history, as far as it still holds them.
#[derive(Debug, Clone, Default)]
pub struct LogFollower {
    next: u64,
}

impl LogFollower {
    /// Follow entries from sequence `next` on
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Sequence number of the next entry expected
    pub fn next_sequence(&self) -> u64 {
        self.next
    }

    /// Entries to show for `entry`, oldest first; empty if already shown
    pub fn accept(&mut self, entry: LogEntry, log: &JogLog) -> Vec<LogEntry> {
        if entry.sequence < self.next {
            return Vec::new();
        }

        let mut out: Vec<LogEntry> = if entry.sequence > self.next {
            tracing::debug!(
                "Recovering log entries {}..{} from history",
                self.next,
                entry.sequence
            );
            log.entries_since(self.next)
                .into_iter()
                .take_while(|missed| missed.sequence < entry.sequence)
                .collect()
        } else {
            Vec::new()
        };

        self.next = entry.sequence + 1;
        out.push(entry);
        out
    }
}
