//! Pairing: drain the waiting pool into open lobbies.

use crate::models::{LobbyId, PlayerId, Tournament, TournamentError};
use rand::Rng;

/// Pick two distinct waiting players uniformly at random, without replacement.
///
/// Returns `None` when fewer than two players are waiting.
pub fn pick_two_waiting<R: Rng + ?Sized>(
    waiting: &[PlayerId],
    rng: &mut R,
) -> Option<[PlayerId; 2]> {
    if waiting.len() < 2 {
        return None;
    }
    let mut candidates = waiting.to_vec();
    let first = candidates.remove(rng.gen_range(0..candidates.len()));
    let second = candidates.remove(rng.gen_range(0..candidates.len()));
    Some([first, second])
}

/// Seat both players in `lobby`, close it, and move them to in-match.
pub fn add_players_to_lobby(
    tournament: &mut Tournament,
    lobby: LobbyId,
    players: [PlayerId; 2],
) -> Result<(), TournamentError> {
    let target = tournament.lobby_mut(lobby)?;
    for id in players {
        target.add_player(id)?;
    }
    tournament.lobby_pool.move_to_closed(lobby)?;
    for id in players {
        tournament.player_pool.move_to_in_match(id)?;
    }
    Ok(())
}

/// Fill open lobbies with random pairs until lobbies or waiting players run out.
///
/// An odd leftover, or anyone beyond `2 * lobbies`, stays waiting for this round.
/// Returns the number of lobbies closed.
pub fn fill_lobbies(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    let mut filled = 0;
    while let Some(lobby) = tournament.lobby_pool.first_open() {
        let Some(pair) = pick_two_waiting(tournament.player_pool.waiting(), &mut tournament.rng)
        else {
            break;
        };
        add_players_to_lobby(tournament, lobby, pair)?;
        filled += 1;
    }
    let stranded = tournament.player_pool.waiting().len();
    if stranded > 0 {
        log::debug!("{} player(s) sit out this round", stranded);
    }
    Ok(filled)
}
