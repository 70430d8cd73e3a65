//! AdaptiveAgent: samples moves by preference weight and reinforces what scored.

use crate::models::{Agent, Exchange, ExchangeView, Move};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory checkpoints are read from and written to.
pub const CHECKPOINT_DIR: &str = "checkpoints";

const MIN_WEIGHT: f64 = 0.05;
const LEARNING_RATE: f64 = 0.1;

/// Persisted training state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub weights: [f64; 3],
    pub matches_reviewed: u32,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            weights: [1.0; 3],
            matches_reviewed: 0,
        }
    }
}

impl Checkpoint {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write file: {}", e))
    }
}

pub struct AdaptiveAgent {
    name: String,
    character: String,
    state: Checkpoint,
    /// Exchanges of the current (or last finished) match.
    memory: Vec<Exchange>,
    /// Set when loading was requested; training writes back here.
    checkpoint_path: Option<PathBuf>,
    rng: StdRng,
}

impl AdaptiveAgent {
    pub fn new(name: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character: character.into(),
            state: Checkpoint::default(),
            memory: Vec::new(),
            checkpoint_path: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Resume from `checkpoints/<name>.json`. A missing or unreadable checkpoint
    /// starts fresh; either way later reviews are saved there.
    pub fn load(name: impl Into<String>, character: impl Into<String>) -> Self {
        let mut agent = Self::new(name, character);
        let path = Path::new(CHECKPOINT_DIR).join(format!("{}.json", agent.name));
        match Checkpoint::load(&path) {
            Ok(state) => {
                log::info!(
                    "Loaded checkpoint for {} ({} reviews)",
                    agent.name,
                    state.matches_reviewed
                );
                agent.state = state;
            }
            Err(e) => log::warn!(
                "No usable checkpoint for {} at {}: {}",
                agent.name,
                path.display(),
                e
            ),
        }
        agent.checkpoint_path = Some(path);
        agent
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn weights(&self) -> [f64; 3] {
        self.state.weights
    }

    pub fn matches_reviewed(&self) -> u32 {
        self.state.matches_reviewed
    }

    /// Exchanges waiting for the next review.
    pub fn remembered(&self) -> usize {
        self.memory.len()
    }
}

impl Agent for AdaptiveAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn character(&self) -> &str {
        &self.character
    }

    fn begin_match(&mut self) {
        self.memory.clear();
    }

    fn choose_move(&mut self, _view: &ExchangeView<'_>) -> Move {
        match WeightedIndex::new(self.state.weights) {
            Ok(dist) => Move::ALL[dist.sample(&mut self.rng)],
            Err(_) => Move::Strike,
        }
    }

    fn observe(&mut self, exchange: &Exchange) {
        self.memory.push(*exchange);
    }

    fn review_and_train(&mut self) {
        if self.memory.is_empty() {
            return;
        }
        for exchange in self.memory.drain(..) {
            let w = &mut self.state.weights[exchange.own.index()];
            *w = (*w + LEARNING_RATE * f64::from(exchange.delta)).max(MIN_WEIGHT);
        }
        self.state.matches_reviewed += 1;
        if let Some(path) = &self.checkpoint_path {
            if let Err(e) = self.state.save(path) {
                log::warn!("Failed to save checkpoint for {}: {}", self.name, e);
            }
        }
    }
}
