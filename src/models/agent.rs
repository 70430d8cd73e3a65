//! Agent capability: the opaque decision/training policy behind a player.

use serde::{Deserialize, Serialize};

/// A move in a single duel exchange.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Strike,
    Block,
    Throw,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Strike, Move::Block, Move::Throw];

    /// Strike beats Throw, Throw beats Block, Block beats Strike.
    pub fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Strike, Move::Throw) | (Move::Throw, Move::Block) | (Move::Block, Move::Strike)
        )
    }

    pub fn index(self) -> usize {
        match self {
            Move::Strike => 0,
            Move::Block => 1,
            Move::Throw => 2,
        }
    }
}

/// What an agent sees before choosing its next move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeView<'a> {
    /// Initial state the match was started from.
    pub state: &'a str,
    pub exchange: u32,
    pub own_score: u32,
    pub opponent_score: u32,
    pub opponent_character: &'a str,
}

/// Result of one exchange, from the observing agent's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub own: Move,
    pub opponent: Move,
    /// 1 if we scored, -1 if the opponent scored, 0 otherwise.
    pub delta: i8,
}

/// A participant's policy. Everything the tournament core needs from an agent
/// is its identity and `review_and_train`; the duel methods are consumed by
/// match engines.
pub trait Agent: Send {
    fn name(&self) -> &str;

    fn character(&self) -> &str;

    /// Called by the match engine before the first exchange of a match.
    fn begin_match(&mut self) {}

    fn choose_move(&mut self, view: &ExchangeView<'_>) -> Move;

    /// Called after every exchange the agent took part in.
    fn observe(&mut self, exchange: &Exchange);

    /// Review the last match and update internal state. Must only touch this agent.
    fn review_and_train(&mut self);
}
