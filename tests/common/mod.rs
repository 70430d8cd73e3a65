//! Scripted agents and engines shared by the integration tests.
#![allow(dead_code)]

use lobby_tournament::{
    Agent, Exchange, ExchangeView, LobbyId, MatchEngine, MatchError, MatchOutcome, Move, Player,
    Seat, Tournament, TournamentConfig,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Always strikes; counts how often it was trained.
pub struct TestAgent {
    name: String,
    character: String,
    trained: Arc<AtomicUsize>,
}

impl Agent for TestAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn character(&self) -> &str {
        &self.character
    }
    fn choose_move(&mut self, _view: &ExchangeView<'_>) -> Move {
        Move::Strike
    }
    fn observe(&mut self, _exchange: &Exchange) {}
    fn review_and_train(&mut self) {
        self.trained.fetch_add(1, Ordering::SeqCst);
    }
}

/// `n` players named P0.. playing c0.., all sharing one training counter.
pub fn players_with_counter(n: usize) -> (Vec<Player>, Arc<AtomicUsize>) {
    let trained = Arc::new(AtomicUsize::new(0));
    let players = (0..n)
        .map(|i| {
            Player::new(Box::new(TestAgent {
                name: format!("P{i}"),
                character: format!("c{i}"),
                trained: Arc::clone(&trained),
            }))
        })
        .collect();
    (players, trained)
}

pub fn players(n: usize) -> Vec<Player> {
    players_with_counter(n).0
}

/// One recorded `play` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedMatch {
    pub state: String,
    pub render: bool,
}

/// Home seat always wins; every call is recorded.
pub struct HomeWins {
    states: Vec<String>,
    log: Arc<Mutex<Vec<PlayedMatch>>>,
}

impl MatchEngine for HomeWins {
    fn initial_states(&self) -> &[String] {
        &self.states
    }
    fn play(
        &mut self,
        state: &str,
        render: bool,
        _home: &mut dyn Agent,
        _away: &mut dyn Agent,
    ) -> Result<MatchOutcome, MatchError> {
        self.log.lock().unwrap().push(PlayedMatch {
            state: state.to_string(),
            render,
        });
        Ok(MatchOutcome::Winner(Seat::Home))
    }
}

pub type MatchLog = Arc<Mutex<Vec<PlayedMatch>>>;

/// Engine factory for `Tournament::new` plus the shared match log.
pub fn home_wins(states: &[&str]) -> (impl FnMut(LobbyId) -> Box<dyn MatchEngine>, MatchLog) {
    let log = MatchLog::default();
    let shared = Arc::clone(&log);
    let states: Vec<String> = states.iter().map(|s| s.to_string()).collect();
    let factory = move |_: LobbyId| -> Box<dyn MatchEngine> {
        Box::new(HomeWins {
            states: states.clone(),
            log: Arc::clone(&shared),
        })
    };
    (factory, log)
}

/// Announces each match on `started` and blocks until `release` yields.
pub struct GatedEngine {
    states: Vec<String>,
    started: Sender<()>,
    release: Arc<Mutex<Receiver<()>>>,
}

impl MatchEngine for GatedEngine {
    fn initial_states(&self) -> &[String] {
        &self.states
    }
    fn play(
        &mut self,
        _state: &str,
        _render: bool,
        _home: &mut dyn Agent,
        _away: &mut dyn Agent,
    ) -> Result<MatchOutcome, MatchError> {
        let _ = self.started.send(());
        self.release
            .lock()
            .map_err(|_| MatchError("release lock poisoned".into()))?
            .recv()
            .map_err(|_| MatchError("released without a signal".into()))?;
        Ok(MatchOutcome::Winner(Seat::Away))
    }
}

pub fn gated(
    started: Sender<()>,
    release: Receiver<()>,
) -> impl FnMut(LobbyId) -> Box<dyn MatchEngine> {
    let release = Arc::new(Mutex::new(release));
    move |_: LobbyId| -> Box<dyn MatchEngine> {
        Box::new(GatedEngine {
            states: vec!["gate".to_string()],
            started: started.clone(),
            release: Arc::clone(&release),
        })
    }
}

pub fn seeded(config: TournamentConfig, seed: u64) -> TournamentConfig {
    TournamentConfig {
        seed: Some(seed),
        ..config
    }
}

/// Check every pool invariant that must hold between operations.
pub fn assert_invariants(t: &Tournament) {
    let pool = t.player_pool();
    let waiting: HashSet<_> = pool.waiting().iter().copied().collect();
    let in_match: HashSet<_> = pool.in_match().iter().copied().collect();
    let all: HashSet<_> = t.players().iter().map(|p| p.id).collect();
    assert!(waiting.is_disjoint(&in_match), "player both waiting and in a match");
    assert_eq!(&waiting | &in_match, all, "player missing from pools");
    assert_eq!(waiting.len() + in_match.len(), all.len());

    let lobbies = t.lobby_pool();
    let open: HashSet<_> = lobbies.open().iter().copied().collect();
    let closed: HashSet<_> = lobbies.closed().iter().copied().collect();
    let every: HashSet<_> = t.lobbies().iter().map(|l| l.id).collect();
    assert!(open.is_disjoint(&closed), "lobby both open and closed");
    assert_eq!(&open | &closed, every, "lobby missing from pools");
    assert_eq!(closed.len(), in_match.len() / 2);

    for id in lobbies.closed() {
        let seated = t.lobby(*id).unwrap().players();
        assert_eq!(seated.len(), 2, "closed lobby must hold two players");
        assert!(seated.iter().all(|p| in_match.contains(p)));
    }
    for id in lobbies.open() {
        assert!(t.lobby(*id).unwrap().players().is_empty(), "open lobby holds players");
    }
}

/// Poll `check` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    check()
}
