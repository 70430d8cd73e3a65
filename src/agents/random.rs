//! Uniform random baseline. Never learns.

use crate::models::{Agent, Exchange, ExchangeView, Move};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct RandomAgent {
    name: String,
    character: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character: character.into(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn character(&self) -> &str {
        &self.character
    }

    fn choose_move(&mut self, _view: &ExchangeView<'_>) -> Move {
        Move::ALL[self.rng.gen_range(0..Move::ALL.len())]
    }

    fn observe(&mut self, _exchange: &Exchange) {}

    fn review_and_train(&mut self) {}
}
