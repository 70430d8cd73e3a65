//! Leaderboard: players ranked by wins, with win percentages.

use crate::models::Standing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `round(wins / matches * 100, 2)`, or `None` before the first match.
pub fn win_percentage(wins: u32, matches_played: u32) -> Option<f64> {
    if matches_played == 0 {
        return None;
    }
    let pct = f64::from(wins) / f64::from(matches_played) * 100.0;
    Some((pct * 100.0).round() / 100.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub character: String,
    pub wins: u32,
    pub matches_played: u32,
    pub win_percentage: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank by wins, descending; ties keep their input order.
    pub fn from_standings(standings: &[Standing]) -> Self {
        let mut sorted: Vec<&Standing> = standings.iter().collect();
        sorted.sort_by(|a, b| b.wins.cmp(&a.wins));
        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(i, s)| LeaderboardEntry {
                rank: i + 1,
                name: s.name.clone(),
                character: s.character.clone(),
                wins: s.wins,
                matches_played: s.matches_played,
                win_percentage: win_percentage(s.wins, s.matches_played),
            })
            .collect();
        Self { entries }
    }
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} playing {} : {} wins : ",
            self.rank, self.name, self.character, self.wins
        )?;
        match self.win_percentage {
            // Debug keeps the ".0" on whole values: 75.0, 33.33.
            Some(pct) => write!(f, "{:?}% win percentage", pct),
            None => write!(f, "no matches played yet"),
        }
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current Tournament Leaderboard:")?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
