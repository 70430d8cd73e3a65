//! Player and Standing data structures.

use crate::models::agent::Agent;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a player (used in pools, lobbies and lookups).
pub type PlayerId = Uuid;

/// Statistics view of a player (for reports / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub character: String,
    pub wins: u32,
    pub matches_played: u32,
}

impl Standing {
    pub fn from_player(p: &Player) -> Self {
        Self {
            name: p.name().to_string(),
            character: p.character().to_string(),
            wins: p.wins,
            matches_played: p.matches_played,
        }
    }
}

/// A tournament participant: counters owned by the tournament, policy owned by the agent.
pub struct Player {
    pub id: PlayerId,
    pub wins: u32,
    pub matches_played: u32,
    agent: Box<dyn Agent>,
}

impl Player {
    /// Wrap an agent as a new player. Counters start at zero.
    pub fn new(agent: Box<dyn Agent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            wins: 0,
            matches_played: 0,
            agent,
        }
    }

    pub fn name(&self) -> &str {
        self.agent.name()
    }

    pub fn character(&self) -> &str {
        self.agent.character()
    }

    /// Current stats as a separate struct (for reports).
    pub fn standing(&self) -> Standing {
        Standing::from_player(self)
    }

    pub fn agent_mut(&mut self) -> &mut dyn Agent {
        self.agent.as_mut()
    }

    /// Record a finished match; `won` is false for losses and draws.
    pub fn record_match(&mut self, won: bool) {
        self.matches_played += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn review_and_train(&mut self) {
        self.agent.review_and_train();
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("character", &self.character())
            .field("wins", &self.wins)
            .field("matches_played", &self.matches_played)
            .finish()
    }
}
