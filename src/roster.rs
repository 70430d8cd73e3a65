//! Roster loading: a CSV file of `agent_type, name, character, load` rows.

use crate::agents::{AgentRegistry, AgentSpec};
use crate::models::Player;
use serde::Deserialize;
use std::path::Path;

/// Default roster location.
pub const DEFAULT_ROSTER_PATH: &str = "roster.txt";

/// Errors while reading a roster. All of them are fatal at startup.
#[derive(Debug)]
pub enum RosterError {
    /// File could not be read, or a row could not be parsed.
    Csv(csv::Error),
    /// No factory is registered for this agent type.
    UnknownAgentType { line: u64, agent_type: String },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Malformed roster: {}", e),
            RosterError::UnknownAgentType { line, agent_type } => {
                write!(f, "Unknown agent type '{}' on roster line {}", agent_type, line)
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Csv(e) => Some(e),
            RosterError::UnknownAgentType { .. } => None,
        }
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

/// One row, by position.
#[derive(Debug, Deserialize)]
struct RosterRow {
    agent_type: String,
    name: String,
    character: String,
    load: String,
}

/// Empty or the literal `False` means false; anything else means true.
pub fn parse_load_flag(raw: &str) -> bool {
    !(raw.is_empty() || raw == "False")
}

impl From<RosterRow> for AgentSpec {
    fn from(row: RosterRow) -> Self {
        let name = if row.name.is_empty() {
            row.agent_type.clone()
        } else {
            row.name
        };
        AgentSpec {
            agent_type: row.agent_type,
            name,
            character: row.character,
            load: parse_load_flag(&row.load),
        }
    }
}

/// Parse roster rows (header line skipped) into agent specs.
pub fn read_specs<R: std::io::Read>(input: R) -> Result<Vec<AgentSpec>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut specs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RosterRow = record.deserialize(None)?;
        specs.push(row.into());
    }
    Ok(specs)
}

/// Parse a roster and build every player through the registry.
pub fn read_roster<R: std::io::Read>(
    input: R,
    registry: &AgentRegistry,
) -> Result<Vec<Player>, RosterError> {
    read_specs(input)?
        .into_iter()
        .enumerate()
        .map(|(i, spec)| -> Result<Player, RosterError> {
            let agent = registry
                .build(&spec)
                .ok_or_else(|| RosterError::UnknownAgentType {
                    // header is line 1
                    line: i as u64 + 2,
                    agent_type: spec.agent_type.clone(),
                })?;
            log::debug!("Roster: {} playing {} ({})", spec.name, spec.character, spec.agent_type);
            Ok(Player::new(agent))
        })
        .collect()
}

/// Read the roster file at `path`.
pub fn load_roster(
    path: impl AsRef<Path>,
    registry: &AgentRegistry,
) -> Result<Vec<Player>, RosterError> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    let players = read_roster(file, registry)?;
    log::info!("Loaded {} players from {}", players.len(), path.as_ref().display());
    Ok(players)
}
