//! Membership pools: every player is waiting or in a match, every lobby is open or closed.

use crate::models::lobby::LobbyId;
use crate::models::player::PlayerId;
use crate::models::tournament::TournamentError;

/// Player membership. `waiting` and `in_match` are disjoint and together hold every player.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlayerPool {
    waiting: Vec<PlayerId>,
    in_match: Vec<PlayerId>,
}

impl PlayerPool {
    /// All players start out waiting.
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            waiting: players.into_iter().collect(),
            in_match: Vec::new(),
        }
    }

    pub fn waiting(&self) -> &[PlayerId] {
        &self.waiting
    }

    pub fn in_match(&self) -> &[PlayerId] {
        &self.in_match
    }

    pub fn len(&self) -> usize {
        self.waiting.len() + self.in_match.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.waiting.contains(&player) || self.in_match.contains(&player)
    }

    /// Insert a new player directly into `waiting`.
    pub fn add(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        if self.contains(player) {
            return Err(TournamentError::DuplicatePlayer(player));
        }
        self.waiting.push(player);
        Ok(())
    }

    pub fn move_to_in_match(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .waiting
            .iter()
            .position(|p| *p == player)
            .ok_or(TournamentError::PlayerNotWaiting(player))?;
        self.waiting.remove(idx);
        self.in_match.push(player);
        Ok(())
    }

    pub fn move_to_waiting(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .in_match
            .iter()
            .position(|p| *p == player)
            .ok_or(TournamentError::PlayerNotInMatch(player))?;
        self.in_match.remove(idx);
        self.waiting.push(player);
        Ok(())
    }
}

/// Lobby membership. `open` and `closed` are disjoint and together hold every lobby.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LobbyPool {
    open: Vec<LobbyId>,
    closed: Vec<LobbyId>,
}

impl LobbyPool {
    /// All lobbies start out open.
    pub fn new(lobbies: impl IntoIterator<Item = LobbyId>) -> Self {
        Self {
            open: lobbies.into_iter().collect(),
            closed: Vec::new(),
        }
    }

    pub fn open(&self) -> &[LobbyId] {
        &self.open
    }

    pub fn closed(&self) -> &[LobbyId] {
        &self.closed
    }

    pub fn len(&self) -> usize {
        self.open.len() + self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First lobby in open order, if any.
    pub fn first_open(&self) -> Option<LobbyId> {
        self.open.first().copied()
    }

    pub fn move_to_closed(&mut self, lobby: LobbyId) -> Result<(), TournamentError> {
        let idx = self
            .open
            .iter()
            .position(|l| *l == lobby)
            .ok_or(TournamentError::LobbyNotOpen(lobby))?;
        self.open.remove(idx);
        self.closed.push(lobby);
        Ok(())
    }

    pub fn move_to_open(&mut self, lobby: LobbyId) -> Result<(), TournamentError> {
        let idx = self
            .closed
            .iter()
            .position(|l| *l == lobby)
            .ok_or(TournamentError::LobbyNotClosed(lobby))?;
        self.closed.remove(idx);
        self.open.push(lobby);
        Ok(())
    }
}
