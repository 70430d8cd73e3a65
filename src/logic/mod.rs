//! Tournament business logic: pairing, round phases, the round loop, console and reports.

mod console;
mod control;
mod leaderboard;
mod round;
mod scheduler;

pub use console::{Console, ConsoleCommand};
pub use control::{
    apply_command, run_tournament, Command, CommandReceiver, ControlError, ControlHandle,
};
pub use leaderboard::{win_percentage, Leaderboard, LeaderboardEntry};
pub use round::{
    clear_lobbies, clear_lobby, execute_matches, execute_matches_with, run_round_cycle,
    run_round_cycle_with, train_players,
};
pub use scheduler::{add_players_to_lobby, fill_lobbies, pick_two_waiting};
