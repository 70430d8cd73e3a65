//! Tournament, its configuration, and the LiveView published to observers.

use crate::models::lobby::{Lobby, LobbyId, MatchEngine, MatchError};
use crate::models::player::{Player, PlayerId, Standing};
use crate::models::pool::{LobbyPool, PlayerPool};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Errors that can occur during tournament operations.
///
/// Apart from `Match`, every variant is an internal invariant breach: the round
/// loop stops at the first one instead of trying to recover.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Player is not in the waiting pool.
    PlayerNotWaiting(PlayerId),
    /// Player is not in the in-match pool.
    PlayerNotInMatch(PlayerId),
    /// Player id is not on the roster.
    PlayerNotFound(PlayerId),
    /// Player id is already on the roster.
    DuplicatePlayer(PlayerId),
    /// Player already holds a seat in this lobby.
    PlayerAlreadySeated(PlayerId),
    /// Lobby is not in the open pool.
    LobbyNotOpen(LobbyId),
    /// Lobby is not in the closed pool.
    LobbyNotClosed(LobbyId),
    /// Lobby id does not exist.
    LobbyNotFound(LobbyId),
    /// Both seats of the lobby are taken.
    LobbyFull(LobbyId),
    /// A closed lobby must hold exactly two players.
    WrongPlayerCount { lobby: LobbyId, found: usize },
    /// The lobby's engine offered no initial state to start from.
    NoInitialStates(LobbyId),
    /// The match engine failed.
    Match { lobby: LobbyId, source: MatchError },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::PlayerNotWaiting(id) => write!(f, "Player {} is not waiting", id),
            TournamentError::PlayerNotInMatch(id) => write!(f, "Player {} is not in a match", id),
            TournamentError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            TournamentError::DuplicatePlayer(id) => {
                write!(f, "Player {} is already registered", id)
            }
            TournamentError::PlayerAlreadySeated(id) => {
                write!(f, "Player {} already has a seat in this lobby", id)
            }
            TournamentError::LobbyNotOpen(id) => write!(f, "{} is not open", id),
            TournamentError::LobbyNotClosed(id) => write!(f, "{} is not closed", id),
            TournamentError::LobbyNotFound(id) => write!(f, "{} not found", id),
            TournamentError::LobbyFull(id) => write!(f, "{} is already full", id),
            TournamentError::WrongPlayerCount { lobby, found } => {
                write!(f, "{} holds {} players, expected 2", lobby, found)
            }
            TournamentError::NoInitialStates(id) => write!(f, "{} has no initial states", id),
            TournamentError::Match { lobby, source } => write!(f, "{}: {}", lobby, source),
        }
    }
}

impl std::error::Error for TournamentError {}

/// How many round cycles to run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundBudget {
    /// Stop once exactly this many rounds have run.
    Limited(u32),
    /// Only an end request stops the tournament.
    Unbounded,
}

impl RoundBudget {
    /// Command-line form: any negative value means unbounded.
    pub fn from_signed(rounds: i64) -> Self {
        if rounds < 0 {
            RoundBudget::Unbounded
        } else {
            RoundBudget::Limited(u32::try_from(rounds).unwrap_or(u32::MAX))
        }
    }

    pub fn is_met(self, rounds_run: u32) -> bool {
        match self {
            RoundBudget::Limited(n) => rounds_run == n,
            RoundBudget::Unbounded => false,
        }
    }
}

/// How post-round training is scheduled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// One player at a time, in in-match order.
    #[default]
    Sequential,
    /// All in-match players at once on the rayon pool.
    Parallel,
}

/// Settings fixed when the tournament is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub rounds: RoundBudget,
    pub train_after_round: bool,
    pub training_mode: TrainingMode,
    /// Initial value of the render flag.
    pub render: bool,
    /// Seed for pairing; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: RoundBudget::Limited(1),
            train_after_round: true,
            training_mode: TrainingMode::Sequential,
            render: false,
            seed: None,
        }
    }
}

/// Phase of the round loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    /// Running round cycles.
    #[default]
    Active,
    /// Holding between cycles until resumed.
    Paused,
    /// Finished; terminal.
    Ended,
}

/// One closed lobby's pairing, for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub lobby: LobbyId,
    pub home: Standing,
    pub away: Standing,
}

/// Read-only snapshot the round loop publishes for the control console.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveView {
    pub phase: TournamentPhase,
    pub rounds_run: u32,
    pub render: bool,
    pub paused: bool,
    pub end_requested: bool,
    /// Closed lobbies of the round in flight (empty between rounds).
    pub matchups: Vec<Matchup>,
    /// Every player, roster order.
    pub standings: Vec<Standing>,
}

/// Shared handle to the latest LiveView.
pub type SharedView = Arc<RwLock<LiveView>>;

/// Full tournament state: roster, lobbies, pools, counters and control flags.
pub struct Tournament {
    pub(crate) players: Vec<Player>,
    pub(crate) lobbies: Vec<Lobby>,
    pub(crate) player_pool: PlayerPool,
    pub(crate) lobby_pool: LobbyPool,
    pub(crate) config: TournamentConfig,
    pub(crate) rounds_run: u32,
    pub(crate) paused: bool,
    pub(crate) ended: bool,
    pub(crate) render: bool,
    pub(crate) phase: TournamentPhase,
    pub(crate) rng: StdRng,
    view: SharedView,
}

impl Tournament {
    /// Create a tournament with `floor(players / 2)` lobbies, each with its own engine.
    pub fn new<F>(players: Vec<Player>, mut engine_for: F, config: TournamentConfig) -> Self
    where
        F: FnMut(LobbyId) -> Box<dyn MatchEngine>,
    {
        let lobbies: Vec<Lobby> = (0..players.len() / 2)
            .map(|i| {
                let id = LobbyId(i);
                Lobby::new(id, engine_for(id))
            })
            .collect();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tournament = Self {
            player_pool: PlayerPool::new(players.iter().map(|p| p.id)),
            lobby_pool: LobbyPool::new(lobbies.iter().map(|l| l.id)),
            players,
            lobbies,
            render: config.render,
            config,
            rounds_run: 0,
            paused: false,
            ended: false,
            phase: TournamentPhase::Active,
            rng,
            view: SharedView::default(),
        };
        tournament.publish();
        tournament
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn lobbies(&self) -> &[Lobby] {
        &self.lobbies
    }

    pub fn lobby(&self, id: LobbyId) -> Option<&Lobby> {
        self.lobbies.get(id.0)
    }

    pub(crate) fn lobby_mut(&mut self, id: LobbyId) -> Result<&mut Lobby, TournamentError> {
        self.lobbies
            .get_mut(id.0)
            .ok_or(TournamentError::LobbyNotFound(id))
    }

    pub fn player_pool(&self) -> &PlayerPool {
        &self.player_pool
    }

    pub fn lobby_pool(&self) -> &LobbyPool {
        &self.lobby_pool
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn rounds_run(&self) -> u32 {
        self.rounds_run
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn end_requested(&self) -> bool {
        self.ended
    }

    pub fn render(&self) -> bool {
        self.render
    }

    /// Add a player after creation. It joins the waiting pool; no lobby is added for it.
    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, TournamentError> {
        let id = player.id;
        self.player_pool.add(id)?;
        log::info!("{} joined the tournament", player.name());
        self.players.push(player);
        self.publish();
        Ok(id)
    }

    /// Every player's stats, roster order.
    pub fn standings(&self) -> Vec<Standing> {
        self.players.iter().map(Player::standing).collect()
    }

    /// Pairings of the currently closed lobbies, closed order.
    pub fn matchups(&self) -> Vec<Matchup> {
        self.lobby_pool
            .closed()
            .iter()
            .filter_map(|&id| {
                let lobby = self.lobby(id)?;
                match lobby.players() {
                    [home, away] => Some(Matchup {
                        lobby: id,
                        home: self.player(*home)?.standing(),
                        away: self.player(*away)?.standing(),
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    /// Handle observers read the LiveView through.
    pub fn live_view(&self) -> SharedView {
        Arc::clone(&self.view)
    }

    /// Replace the published LiveView with the current state.
    pub fn publish(&self) {
        let snapshot = LiveView {
            phase: self.phase,
            rounds_run: self.rounds_run,
            render: self.render,
            paused: self.paused,
            end_requested: self.ended,
            matchups: self.matchups(),
            standings: self.standings(),
        };
        match self.view.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(_) => log::warn!("live view lock poisoned; snapshot skipped"),
        }
    }
}
