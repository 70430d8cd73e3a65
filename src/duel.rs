//! DuelEngine: a small simultaneous-move match used by the tournament binary.
//!
//! Each exchange both agents pick Strike, Block or Throw. The winner of an
//! exchange scores a point; first to `points_to_win` takes the match. If the
//! exchange limit is hit, the leader wins, and equal scores are a draw.

use crate::models::{
    Agent, Exchange, ExchangeView, MatchEngine, MatchError, MatchOutcome, Move, Seat,
};

/// Stages a lobby offers, in order. The tournament always starts from the first.
pub const DEFAULT_STAGES: [&str; 4] = [
    "Champion.Level1",
    "Champion.Level2",
    "Champion.Level3",
    "Champion.Level4",
];

pub const DEFAULT_POINTS_TO_WIN: u32 = 3;
pub const DEFAULT_MAX_EXCHANGES: u32 = 25;

#[derive(Clone, Debug)]
pub struct DuelEngine {
    stages: Vec<String>,
    points_to_win: u32,
    max_exchanges: u32,
}

impl Default for DuelEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STAGES.iter().map(|s| s.to_string()).collect())
    }
}

impl DuelEngine {
    pub fn new(stages: Vec<String>) -> Self {
        Self {
            stages,
            points_to_win: DEFAULT_POINTS_TO_WIN,
            max_exchanges: DEFAULT_MAX_EXCHANGES,
        }
    }

    pub fn with_limits(mut self, points_to_win: u32, max_exchanges: u32) -> Self {
        self.points_to_win = points_to_win.max(1);
        self.max_exchanges = max_exchanges.max(1);
        self
    }
}

/// +1 if `own` wins the exchange, -1 if it loses, 0 on a trade.
fn resolve(own: Move, opponent: Move) -> i8 {
    if own.beats(opponent) {
        1
    } else if opponent.beats(own) {
        -1
    } else {
        0
    }
}

impl MatchEngine for DuelEngine {
    fn initial_states(&self) -> &[String] {
        &self.stages
    }

    fn play(
        &mut self,
        state: &str,
        render: bool,
        home: &mut dyn Agent,
        away: &mut dyn Agent,
    ) -> Result<MatchOutcome, MatchError> {
        if !self.stages.iter().any(|s| s == state) {
            return Err(MatchError(format!("unknown stage '{}'", state)));
        }
        home.begin_match();
        away.begin_match();
        let home_character = home.character().to_string();
        let away_character = away.character().to_string();
        let (mut home_score, mut away_score) = (0u32, 0u32);

        for exchange in 1..=self.max_exchanges {
            let home_move = home.choose_move(&ExchangeView {
                state,
                exchange,
                own_score: home_score,
                opponent_score: away_score,
                opponent_character: &away_character,
            });
            let away_move = away.choose_move(&ExchangeView {
                state,
                exchange,
                own_score: away_score,
                opponent_score: home_score,
                opponent_character: &home_character,
            });
            let delta = resolve(home_move, away_move);
            match delta {
                1 => home_score += 1,
                -1 => away_score += 1,
                _ => {}
            }
            home.observe(&Exchange {
                own: home_move,
                opponent: away_move,
                delta,
            });
            away.observe(&Exchange {
                own: away_move,
                opponent: home_move,
                delta: -delta,
            });
            if render {
                println!(
                    "[{}] #{:>2} {} {:?} vs {:?} {}  ({}-{})",
                    state,
                    exchange,
                    home_character,
                    home_move,
                    away_move,
                    away_character,
                    home_score,
                    away_score
                );
            }
            if home_score >= self.points_to_win || away_score >= self.points_to_win {
                break;
            }
        }

        let outcome = match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(Seat::Home),
            std::cmp::Ordering::Less => MatchOutcome::Winner(Seat::Away),
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        };
        log::debug!(
            "{} vs {} on {}: {}-{} ({:?})",
            home.name(),
            away.name(),
            state,
            home_score,
            away_score,
            outcome
        );
        Ok(outcome)
    }
}
