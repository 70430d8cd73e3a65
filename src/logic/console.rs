//! Interactive control console: reads commands, flips flags, prints reports.

use crate::logic::control::{Command, ControlHandle};
use std::io::{self, BufRead, Write};

/// Console vocabulary. `parse` accepts the exact strings plus their short aliases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsoleCommand {
    Pause,
    Start,
    ViewRounds,
    ViewMatches,
    ViewWins,
    OpenViewer,
    CloseViewer,
    End,
    Help,
}

impl ConsoleCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let cmd = match input.trim() {
            "pause" => ConsoleCommand::Pause,
            "start" => ConsoleCommand::Start,
            "view-rounds" | "view rounds" | "vr" => ConsoleCommand::ViewRounds,
            "view-matches" | "view matches" | "vm" => ConsoleCommand::ViewMatches,
            "view-wins" | "view wins" | "vw" => ConsoleCommand::ViewWins,
            "open-viewer" | "open viewer" | "ov" => ConsoleCommand::OpenViewer,
            "close-viewer" | "close viewer" | "cv" => ConsoleCommand::CloseViewer,
            "end" => ConsoleCommand::End,
            "help" | "?" => ConsoleCommand::Help,
            _ => return None,
        };
        Some(cmd)
    }
}

const HELP: &str = "Commands: pause, start, view-rounds (vr), view-matches (vm), view-wins (vw), \
open-viewer (ov), close-viewer (cv), end";

/// Reads commands from `input` until `end` (or EOF) and writes replies to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
    handle: ControlHandle,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, handle: ControlHandle) -> Self {
        Self {
            input,
            output,
            handle,
        }
    }

    /// Read and execute commands until `end`. EOF is treated as `end`.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, ">> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                self.execute(ConsoleCommand::End)?;
                return Ok(());
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            match ConsoleCommand::parse(input) {
                Some(cmd) => {
                    if !self.execute(cmd)? {
                        return Ok(());
                    }
                }
                None => writeln!(
                    self.output,
                    "Unknown command '{}'. Type 'help' for a list.",
                    input
                )?,
            }
        }
    }

    /// Execute one command. Returns `false` once the console should stop reading.
    pub fn execute(&mut self, cmd: ConsoleCommand) -> io::Result<bool> {
        match cmd {
            ConsoleCommand::Pause => {
                writeln!(self.output, "Pausing tournament after this round..")?;
                self.send(Command::Pause)?;
            }
            ConsoleCommand::Start => {
                writeln!(self.output, "Resuming tournament..")?;
                self.send(Command::Resume)?;
            }
            ConsoleCommand::ViewRounds => {
                writeln!(
                    self.output,
                    "Tournament is currently on round {}",
                    self.handle.rounds_run() + 1
                )?;
            }
            ConsoleCommand::ViewMatches => {
                let view = self.handle.view();
                writeln!(self.output, "Match lineup for round {}:", view.rounds_run + 1)?;
                for (i, m) in view.matchups.iter().enumerate() {
                    writeln!(
                        self.output,
                        "Game {}: {} vs {}",
                        i + 1,
                        m.home.character,
                        m.away.character
                    )?;
                }
            }
            ConsoleCommand::ViewWins => {
                write!(self.output, "{}", self.handle.leaderboard())?;
            }
            ConsoleCommand::OpenViewer => {
                writeln!(self.output, "Turning on viewport at the start of the next match..")?;
                self.send(Command::SetRender(true))?;
            }
            ConsoleCommand::CloseViewer => {
                writeln!(self.output, "Closing viewport after this match..")?;
                self.send(Command::SetRender(false))?;
            }
            ConsoleCommand::End => {
                writeln!(self.output, "Ending Tournament after this round..")?;
                // A finished loop has nothing left to stop.
                let _ = self.handle.end();
                return Ok(false);
            }
            ConsoleCommand::Help => writeln!(self.output, "{}", HELP)?,
        }
        Ok(true)
    }

    fn send(&mut self, command: Command) -> io::Result<()> {
        if self.handle.send(command).is_err() {
            writeln!(self.output, "Tournament has already finished; command ignored.")?;
        }
        Ok(())
    }

    /// Give back the output sink (tests inspect what was written).
    pub fn into_output(self) -> W {
        self.output
    }
}
