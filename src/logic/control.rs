//! Round loop state machine and the command channel that controls it.
//!
//! The loop thread owns the `Tournament`. Controllers hold a `ControlHandle`:
//! commands travel over an mpsc channel and are applied by the loop at round
//! boundaries (and before each match, for the viewer flag); reports are read
//! from the published `LiveView`.

use crate::logic::leaderboard::Leaderboard;
use crate::logic::round::run_round_cycle_with;
use crate::models::{
    LiveView, Matchup, Player, PlayerId, SharedView, Tournament, TournamentError, TournamentPhase,
};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// A control request for the round loop.
#[derive(Debug)]
pub enum Command {
    /// Hold after the round in flight.
    Pause,
    /// Leave the paused hold.
    Resume,
    /// Stop after the round in flight. Not observed while paused.
    End,
    /// Turn match rendering on or off from the next match.
    SetRender(bool),
    /// Put a late arrival in the waiting pool. It is paired from the next fill.
    AddPlayer(Player),
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Command::Pause, Command::Pause)
            | (Command::Resume, Command::Resume)
            | (Command::End, Command::End) => true,
            (Command::SetRender(a), Command::SetRender(b)) => a == b,
            (Command::AddPlayer(a), Command::AddPlayer(b)) => a.id == b.id,
            _ => false,
        }
    }
}

/// Receiving end of the command channel; handed to `run_tournament`.
pub type CommandReceiver = Receiver<Command>;

/// Errors returned to controllers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlError {
    /// The round loop has finished and dropped its receiver.
    LoopStopped,
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::LoopStopped => write!(f, "Tournament loop is no longer running"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Sends commands to a running tournament and reads its LiveView.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    sender: Sender<Command>,
    view: SharedView,
}

impl ControlHandle {
    /// Create a handle plus the receiver the loop will drain.
    pub fn channel(tournament: &Tournament) -> (Self, CommandReceiver) {
        let (sender, receiver) = mpsc::channel();
        let handle = Self {
            sender,
            view: tournament.live_view(),
        };
        (handle, receiver)
    }

    pub fn send(&self, command: Command) -> Result<(), ControlError> {
        self.sender
            .send(command)
            .map_err(|_| ControlError::LoopStopped)
    }

    pub fn pause(&self) -> Result<(), ControlError> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<(), ControlError> {
        self.send(Command::Resume)
    }

    pub fn end(&self) -> Result<(), ControlError> {
        self.send(Command::End)
    }

    pub fn set_render(&self, render: bool) -> Result<(), ControlError> {
        self.send(Command::SetRender(render))
    }

    /// Hand a new player to the loop; returns the id it will be known by.
    pub fn add_player(&self, player: Player) -> Result<PlayerId, ControlError> {
        let id = player.id;
        self.send(Command::AddPlayer(player))?;
        Ok(id)
    }

    /// Latest published snapshot.
    pub fn view(&self) -> LiveView {
        match self.view.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn phase(&self) -> TournamentPhase {
        self.view().phase
    }

    pub fn rounds_run(&self) -> u32 {
        self.view().rounds_run
    }

    pub fn matchups(&self) -> Vec<Matchup> {
        self.view().matchups
    }

    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::from_standings(&self.view().standings)
    }
}

/// Apply one command to the control flags. Transitions happen in the loop.
pub fn apply_command(tournament: &mut Tournament, command: Command) {
    match command {
        Command::Pause => {
            tournament.paused = true;
            log::info!("Pause requested; holding after this round");
        }
        Command::Resume => {
            tournament.paused = false;
            log::info!("Resume requested");
        }
        Command::End => {
            tournament.ended = true;
            if tournament.phase == TournamentPhase::Paused {
                log::warn!("End requested while paused; takes effect once resumed");
            } else {
                log::info!("End requested; stopping after this round");
            }
        }
        Command::SetRender(render) => {
            tournament.render = render;
            log::info!("Match rendering {}", if render { "on" } else { "off" });
        }
        Command::AddPlayer(player) => {
            if let Err(e) = tournament.add_player(player) {
                log::warn!("Player not added: {}", e);
            }
        }
    }
    tournament.publish();
}

/// Apply every pending command without blocking.
///
/// Once every handle is gone nobody can end an unbounded run, so that counts as an end request.
fn drain_commands(tournament: &mut Tournament, commands: &CommandReceiver) {
    loop {
        match commands.try_recv() {
            Ok(command) => apply_command(tournament, command),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                if !tournament.ended {
                    log::warn!("All controllers disconnected; ending after this round");
                    tournament.ended = true;
                    tournament.publish();
                }
                break;
            }
        }
    }
}

/// Block on the channel until a resume arrives.
///
/// If every handle is gone no resume can ever arrive, so that counts as an end request.
fn hold_while_paused(tournament: &mut Tournament, commands: &CommandReceiver) {
    tournament.phase = TournamentPhase::Paused;
    tournament.publish();
    log::info!("Tournament paused after round {}", tournament.rounds_run);
    while tournament.paused {
        match commands.recv() {
            Ok(command) => apply_command(tournament, command),
            Err(_) => {
                log::warn!("All controllers disconnected while paused; ending tournament");
                tournament.paused = false;
                tournament.ended = true;
            }
        }
    }
    tournament.phase = TournamentPhase::Active;
    tournament.publish();
    log::info!("Tournament resumed");
}

/// Run round cycles until the budget is met or an end request is observed.
///
/// At each boundary: a set pause flag holds the loop first; otherwise the end
/// flag or an exactly-met budget stops it; otherwise one more cycle runs.
/// Returns the first invariant breach or match failure, after marking the
/// tournament ended.
pub fn run_tournament(
    tournament: &mut Tournament,
    commands: &CommandReceiver,
) -> Result<(), TournamentError> {
    log::info!(
        "Starting tournament: {} players, {} lobbies, budget {:?}",
        tournament.players.len(),
        tournament.lobbies.len(),
        tournament.config.rounds
    );
    loop {
        drain_commands(tournament, commands);
        if tournament.paused {
            hold_while_paused(tournament, commands);
            continue;
        }
        if tournament.ended || tournament.config.rounds.is_met(tournament.rounds_run) {
            break;
        }
        if let Err(e) = run_round_cycle_with(tournament, |t| drain_commands(t, commands)) {
            log::error!("Round {} aborted: {}", tournament.rounds_run + 1, e);
            tournament.phase = TournamentPhase::Ended;
            tournament.publish();
            return Err(e);
        }
    }
    tournament.phase = TournamentPhase::Ended;
    tournament.publish();
    log::info!("Tournament ended after {} round(s)", tournament.rounds_run);
    Ok(())
}
