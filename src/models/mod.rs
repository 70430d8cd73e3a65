//! Data structures for the tournament: agents, players, lobbies, pools, tournament state.

mod agent;
mod lobby;
mod player;
mod pool;
mod tournament;

pub use agent::{Agent, Exchange, ExchangeView, Move};
pub use lobby::{Lobby, LobbyId, MatchEngine, MatchError, MatchOutcome, Seat, LOBBY_CAPACITY};
pub use player::{Player, PlayerId, Standing};
pub use pool::{LobbyPool, PlayerPool};
pub use tournament::{
    LiveView, Matchup, RoundBudget, SharedView, Tournament, TournamentConfig, TournamentError,
    TournamentPhase, TrainingMode,
};
