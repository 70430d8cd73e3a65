//! Tournament runner: rounds play on a background thread while the console reads commands.
//! Run with: cargo run --bin tournament -- --rounds 5 --review-games
//! Logging follows RUST_LOG; `--verbose` raises the default filter to debug.

use clap::Parser;
use lobby_tournament::agents::{AgentRegistry, AgentSpec, DEFAULT_AGENT};
use lobby_tournament::duel::DuelEngine;
use lobby_tournament::roster::{load_roster, DEFAULT_ROSTER_PATH};
use lobby_tournament::{
    run_tournament, Console, ControlHandle, Leaderboard, MatchEngine, Player, RoundBudget,
    Tournament, TournamentConfig, TrainingMode,
};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::thread;

/// Characters handed out round-robin when no roster is loaded.
const CHARACTERS: [&str; 8] = [
    "ryu", "blanka", "guile", "ehonda", "ken", "chunli", "zangief", "dhalsim",
];

#[derive(Parser, Debug)]
#[command(name = "tournament")]
#[command(about = "Pair agents into lobbies, play rounds, and train between them")]
struct Args {
    /// Load player profiles from a roster file
    #[arg(short = 'l', long, num_args = 0..=1, default_missing_value = DEFAULT_ROSTER_PATH)]
    load_players: Option<PathBuf>,

    /// Number of players to create when no roster is loaded
    #[arg(short = 'n', long, default_value_t = 8)]
    num_players: usize,

    /// Rounds to play; a negative value runs until `end`
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    rounds: i64,

    /// Let agents review and train after each round
    #[arg(short = 't', long)]
    review_games: bool,

    /// Train all agents of a round in parallel
    #[arg(long)]
    parallel_training: bool,

    /// Render matches as they are played
    #[arg(short = 'v', long)]
    visualize: bool,

    /// Debug-level logging
    #[arg(long)]
    verbose: bool,

    /// Seed for pairing
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final leaderboard as JSON
    #[arg(long)]
    results: Option<PathBuf>,
}

fn default_players(registry: &AgentRegistry, count: usize) -> Vec<Player> {
    (0..count)
        .filter_map(|i| {
            let spec = AgentSpec {
                agent_type: DEFAULT_AGENT.to_string(),
                name: format!("{} {}", DEFAULT_AGENT, i + 1),
                character: CHARACTERS[i % CHARACTERS.len()].to_string(),
                load: false,
            };
            registry.build(&spec).map(Player::new)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let registry = AgentRegistry::with_builtins();
    let players = match &args.load_players {
        Some(path) => load_roster(path, &registry)?,
        None => default_players(&registry, args.num_players),
    };

    let config = TournamentConfig {
        rounds: RoundBudget::from_signed(args.rounds),
        train_after_round: args.review_games,
        training_mode: if args.parallel_training {
            TrainingMode::Parallel
        } else {
            TrainingMode::Sequential
        },
        render: args.visualize,
        seed: args.seed,
    };
    let mut tournament = Tournament::new(
        players,
        |_| -> Box<dyn MatchEngine> { Box::new(DuelEngine::default()) },
        config,
    );
    let (handle, commands) = ControlHandle::channel(&tournament);
    log::info!(
        "{} players in {} lobbies",
        tournament.players().len(),
        tournament.lobbies().len()
    );

    let worker = thread::Builder::new()
        .name("round-loop".to_string())
        .spawn(move || {
            let result = run_tournament(&mut tournament, &commands);
            if result.is_ok() {
                println!(
                    "\nTournament finished after {} round(s). Type 'end' to exit.",
                    tournament.rounds_run()
                );
            }
            (tournament, result)
        })?;

    Console::new(io::stdin().lock(), io::stdout(), handle).run()?;

    let (tournament, result) = worker.join().map_err(|_| "round loop panicked")?;
    let leaderboard = Leaderboard::from_standings(&tournament.standings());
    print!("{}", leaderboard);
    if let Some(path) = &args.results {
        let json = serde_json::to_string_pretty(&leaderboard)?;
        std::fs::write(path, json)?;
        log::info!("Wrote results to {}", path.display());
    }
    if let Err(e) = result {
        log::error!("Tournament aborted: {}", e);
        return Err(e.into());
    }
    Ok(())
}
