//! One round cycle: execute matches, optional training, cleanup.

use crate::logic::scheduler::fill_lobbies;
use crate::models::{LobbyId, Player, PlayerId, Tournament, TournamentError, TrainingMode};
use rayon::prelude::*;
use std::time::Instant;

/// Play every closed lobby's match, in closed order, then count the round.
///
/// `before_each` runs before every match; the round loop uses it to pick up a
/// viewer toggle. The round counter advances even when no lobby was closed.
pub fn execute_matches_with<F>(
    tournament: &mut Tournament,
    mut before_each: F,
) -> Result<usize, TournamentError>
where
    F: FnMut(&mut Tournament),
{
    let round = tournament.rounds_run + 1;
    log::info!("Beginning tournament round {}..", round);
    let closed: Vec<LobbyId> = tournament.lobby_pool.closed().to_vec();
    for &id in &closed {
        before_each(tournament);
        let render = tournament.render;
        let lobby = tournament
            .lobbies
            .get_mut(id.0)
            .ok_or(TournamentError::LobbyNotFound(id))?;
        let state = lobby
            .initial_states()
            .first()
            .cloned()
            .ok_or(TournamentError::NoInitialStates(id))?;
        if let [home, away] = lobby.players() {
            log::info!(
                "Now playing: {} vs {} ({})",
                character_of(&tournament.players, *home),
                character_of(&tournament.players, *away),
                state
            );
        }
        let outcome = lobby.play(&state, render, &mut tournament.players)?;
        log::debug!("{} finished: {:?}", id, outcome);
        tournament.publish();
    }
    tournament.rounds_run += 1;
    log::info!("Tournament round {} complete", round);
    Ok(closed.len())
}

fn character_of(players: &[Player], id: PlayerId) -> &str {
    players
        .iter()
        .find(|p| p.id == id)
        .map_or("?", Player::character)
}

/// `execute_matches_with` without a per-match hook.
pub fn execute_matches(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    execute_matches_with(tournament, |_| {})
}

/// Run `review_and_train` for every in-match player and wait for all of them.
pub fn train_players(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    let in_match = tournament.player_pool.in_match().to_vec();
    if let Some(missing) = in_match
        .iter()
        .find(|id| !tournament.players.iter().any(|p| p.id == **id))
    {
        return Err(TournamentError::PlayerNotFound(*missing));
    }

    log::info!("Beginning fighter review..");
    let start = Instant::now();
    match tournament.config.training_mode {
        TrainingMode::Sequential => {
            for id in &in_match {
                if let Some(player) = tournament.players.iter_mut().find(|p| p.id == *id) {
                    player.review_and_train();
                }
            }
        }
        TrainingMode::Parallel => {
            tournament
                .players
                .par_iter_mut()
                .filter(|p| in_match.contains(&p.id))
                .for_each(Player::review_and_train);
        }
    }
    log::debug!("Fighter review of {} player(s) took {:?}", in_match.len(), start.elapsed());
    log::info!("Fighter review complete");
    Ok(in_match.len())
}

/// Return one closed lobby's players to waiting and reopen it.
pub fn clear_lobby(tournament: &mut Tournament, id: LobbyId) -> Result<(), TournamentError> {
    let lobby = tournament.lobby_mut(id)?;
    let seated = lobby.players().to_vec();
    if seated.len() != 2 {
        return Err(TournamentError::WrongPlayerCount {
            lobby: id,
            found: seated.len(),
        });
    }
    lobby.clear_assignment();
    for player in seated {
        tournament.player_pool.move_to_waiting(player)?;
    }
    tournament.lobby_pool.move_to_open(id)
}

/// Clear every closed lobby.
pub fn clear_lobbies(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let closed = tournament.lobby_pool.closed().to_vec();
    for id in closed {
        clear_lobby(tournament, id)?;
    }
    Ok(())
}

/// Schedule, execute, train (if enabled) and clean up, as one unit.
pub fn run_round_cycle_with<F>(
    tournament: &mut Tournament,
    before_each: F,
) -> Result<(), TournamentError>
where
    F: FnMut(&mut Tournament),
{
    let paired = fill_lobbies(tournament)?;
    tournament.publish();
    log::debug!("{} lobbies closed for round {}", paired, tournament.rounds_run + 1);

    execute_matches_with(tournament, before_each)?;
    if tournament.config.train_after_round {
        train_players(tournament)?;
    }
    clear_lobbies(tournament)?;
    tournament.publish();
    Ok(())
}

/// `run_round_cycle_with` without a per-match hook.
pub fn run_round_cycle(tournament: &mut Tournament) -> Result<(), TournamentError> {
    run_round_cycle_with(tournament, |_| {})
}
