//! Lobby tournament runner: library with models, round logic, agents and roster loading.

pub mod agents;
pub mod duel;
pub mod logic;
pub mod models;
pub mod roster;

pub use logic::{
    add_players_to_lobby, apply_command, clear_lobbies, clear_lobby, execute_matches,
    execute_matches_with, fill_lobbies, pick_two_waiting, run_round_cycle, run_round_cycle_with,
    run_tournament, train_players, win_percentage, Command, CommandReceiver, Console,
    ConsoleCommand, ControlError, ControlHandle, Leaderboard, LeaderboardEntry,
};
pub use models::{
    Agent, Exchange, ExchangeView, LiveView, Lobby, LobbyId, LobbyPool, MatchEngine, MatchError,
    MatchOutcome, Matchup, Move, Player, PlayerId, PlayerPool, RoundBudget, Seat, SharedView,
    Standing, Tournament, TournamentConfig, TournamentError, TournamentPhase, TrainingMode,
};
