//! Lobby: a two-seat match container, and the MatchEngine that plays inside it.

use crate::models::agent::Agent;
use crate::models::player::{Player, PlayerId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Players per lobby.
pub const LOBBY_CAPACITY: usize = 2;

/// Index of a lobby within the tournament (lobbies are never destroyed).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct LobbyId(pub usize);

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lobby #{}", self.0 + 1)
    }
}

/// Which seat of a lobby.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Home,
    Away,
}

/// How a match ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner(Seat),
    Draw,
}

/// Failure reported by a match engine. Not retried.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchError(pub String);

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match failed: {}", self.0)
    }
}

impl std::error::Error for MatchError {}

/// The blocking "play a match" capability behind a lobby.
pub trait MatchEngine: Send {
    /// Candidate initial states, in order. Expected to be non-empty.
    fn initial_states(&self) -> &[String];

    /// Play one match to completion. May block for a long time.
    fn play(
        &mut self,
        state: &str,
        render: bool,
        home: &mut dyn Agent,
        away: &mut dyn Agent,
    ) -> Result<MatchOutcome, MatchError>;
}

/// A lobby: up to two assigned players and the engine their match runs on.
pub struct Lobby {
    pub id: LobbyId,
    seats: Vec<PlayerId>,
    engine: Box<dyn MatchEngine>,
}

impl Lobby {
    pub fn new(id: LobbyId, engine: Box<dyn MatchEngine>) -> Self {
        Self {
            id,
            seats: Vec::with_capacity(LOBBY_CAPACITY),
            engine,
        }
    }

    /// Assigned players, home seat first.
    pub fn players(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() == LOBBY_CAPACITY
    }

    pub fn add_player(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        if self.is_full() {
            return Err(TournamentError::LobbyFull(self.id));
        }
        if self.seats.contains(&player) {
            return Err(TournamentError::PlayerAlreadySeated(player));
        }
        self.seats.push(player);
        Ok(())
    }

    pub fn clear_assignment(&mut self) {
        self.seats.clear();
    }

    pub fn initial_states(&self) -> &[String] {
        self.engine.initial_states()
    }

    /// Play this lobby's match from `state` and record the result on both players.
    pub fn play(
        &mut self,
        state: &str,
        render: bool,
        roster: &mut [Player],
    ) -> Result<MatchOutcome, TournamentError> {
        let (home_id, away_id) = match self.seats.as_slice() {
            [home, away] => (*home, *away),
            seats => {
                return Err(TournamentError::WrongPlayerCount {
                    lobby: self.id,
                    found: seats.len(),
                })
            }
        };
        let (home, away) = pair_mut(roster, home_id, away_id)?;
        let outcome = self
            .engine
            .play(state, render, home.agent_mut(), away.agent_mut())
            .map_err(|source| TournamentError::Match {
                lobby: self.id,
                source,
            })?;
        home.record_match(outcome == MatchOutcome::Winner(Seat::Home));
        away.record_match(outcome == MatchOutcome::Winner(Seat::Away));
        Ok(outcome)
    }
}

/// Two distinct mutable players out of the roster.
fn pair_mut(
    roster: &mut [Player],
    a: PlayerId,
    b: PlayerId,
) -> Result<(&mut Player, &mut Player), TournamentError> {
    let i = roster
        .iter()
        .position(|p| p.id == a)
        .ok_or(TournamentError::PlayerNotFound(a))?;
    let j = roster
        .iter()
        .position(|p| p.id == b)
        .ok_or(TournamentError::PlayerNotFound(b))?;
    if i == j {
        return Err(TournamentError::PlayerAlreadySeated(a));
    }
    if i < j {
        let (lo, hi) = roster.split_at_mut(j);
        Ok((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = roster.split_at_mut(i);
        Ok((&mut hi[0], &mut lo[j]))
    }
}
