//! End-to-end tests for the round loop state machine and its control channel.

mod common;

use common::{
    assert_invariants, gated, home_wins, players, players_with_counter, seeded, wait_until,
};
use lobby_tournament::{
    run_tournament, ControlError, ControlHandle, RoundBudget, Tournament, TournamentConfig,
    TournamentPhase,
};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn config(rounds: RoundBudget) -> TournamentConfig {
    seeded(
        TournamentConfig {
            rounds,
            train_after_round: true,
            ..TournamentConfig::default()
        },
        7,
    )
}

#[test]
fn four_players_one_round() {
    let (players, trained) = players_with_counter(4);
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players, engines, config(RoundBudget::Limited(1)));
    let (_handle, commands) = ControlHandle::channel(&t);

    run_tournament(&mut t, &commands).unwrap();

    assert_eq!(t.rounds_run(), 1);
    assert_eq!(t.phase(), TournamentPhase::Ended);
    assert_eq!(t.player_pool().waiting().len(), 4);
    assert_eq!(t.lobby_pool().open().len(), 2);
    assert!(t.players().iter().all(|p| p.matches_played == 1));
    assert_eq!(t.players().iter().map(|p| p.wins).sum::<u32>(), 2);
    assert_eq!(trained.load(Ordering::SeqCst), 4);
    assert_invariants(&t);
}

#[test]
fn budget_stops_at_exactly_the_requested_round() {
    for budget in [0, 1, 3, 10] {
        let (engines, _) = home_wins(&["s"]);
        let mut t = Tournament::new(players(6), engines, config(RoundBudget::Limited(budget)));
        let (_handle, commands) = ControlHandle::channel(&t);
        run_tournament(&mut t, &commands).unwrap();
        assert_eq!(t.rounds_run(), budget);
        assert_invariants(&t);
    }
}

#[test]
fn end_before_start_runs_no_rounds() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    handle.end().unwrap();
    run_tournament(&mut t, &commands).unwrap();
    assert_eq!(t.rounds_run(), 0);
    assert!(t.end_requested());
}

#[test]
fn unbounded_runs_until_end() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    assert!(wait_until(TIMEOUT, || handle.rounds_run() >= 5));
    handle.end().unwrap();
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert!(t.rounds_run() >= 5);
    assert_eq!(handle.phase(), TournamentPhase::Ended);
    assert_invariants(&t);

    // The loop dropped its receiver.
    assert_eq!(handle.pause(), Err(ControlError::LoopStopped));
}

#[test]
fn pause_mid_round_lets_the_cycle_finish() {
    let (players, trained) = players_with_counter(4);
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let engines = gated(started_tx, release_rx);
    let mut t = Tournament::new(players, engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    // First match of round 1 is in flight.
    started_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(handle.view().matchups.len(), 2);
    handle.pause().unwrap();
    release_tx.send(()).unwrap();
    release_tx.send(()).unwrap();

    assert!(wait_until(TIMEOUT, || handle.phase() == TournamentPhase::Paused));
    let view = handle.view();
    assert_eq!(view.rounds_run, 1);
    assert!(view.matchups.is_empty());
    assert!(view.standings.iter().all(|s| s.matches_played == 1));
    assert_eq!(trained.load(Ordering::SeqCst), 4);

    // Held: no second round starts.
    thread::sleep(Duration::from_millis(50));
    assert!(started_rx.try_recv().is_ok(), "second match of round 1 ran");
    assert!(started_rx.try_recv().is_err());

    handle.end().unwrap();
    handle.resume().unwrap();
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert_eq!(t.rounds_run(), 1);
    assert!(t.lobby_pool().closed().is_empty());
    assert!(t.player_pool().in_match().is_empty());
    assert_invariants(&t);
}

#[test]
fn end_while_paused_waits_for_resume() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    handle.pause().unwrap();
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    assert!(wait_until(TIMEOUT, || handle.phase() == TournamentPhase::Paused));
    handle.end().unwrap();
    assert!(wait_until(TIMEOUT, || handle.view().end_requested));

    // End is recorded but not observed while paused.
    thread::sleep(Duration::from_millis(50));
    assert!(!worker.is_finished());
    assert_eq!(handle.phase(), TournamentPhase::Paused);

    handle.resume().unwrap();
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert_eq!(t.phase(), TournamentPhase::Ended);
    assert_eq!(t.rounds_run(), 0);
}

#[test]
fn dropping_every_handle_while_paused_ends_the_loop() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    handle.pause().unwrap();
    drop(handle);

    run_tournament(&mut t, &commands).unwrap();
    assert_eq!(t.phase(), TournamentPhase::Ended);
    assert!(t.end_requested());
    assert!(!t.is_paused());
    assert_eq!(t.rounds_run(), 0);
}

#[test]
fn pause_then_resume_continues_to_the_budget() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Limited(3)));
    let (handle, commands) = ControlHandle::channel(&t);
    handle.pause().unwrap();
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    assert!(wait_until(TIMEOUT, || handle.phase() == TournamentPhase::Paused));
    assert_eq!(handle.rounds_run(), 0);
    handle.resume().unwrap();
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert_eq!(t.rounds_run(), 3);
}

#[test]
fn late_player_joins_a_running_tournament() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    assert!(wait_until(TIMEOUT, || handle.rounds_run() >= 2));
    let late = players(1).pop().unwrap();
    let id = handle.add_player(late).unwrap();
    assert!(wait_until(TIMEOUT, || handle.view().standings.len() == 5));
    let seen_at = handle.rounds_run();
    assert!(wait_until(TIMEOUT, || handle.rounds_run() >= seen_at + 3));

    handle.end().unwrap();
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert_eq!(t.players().len(), 5);
    assert_eq!(t.lobbies().len(), 2);
    assert_eq!(t.player_pool().waiting().len(), 5);
    assert!(t.player_pool().waiting().contains(&id));
    assert_invariants(&t);
}

#[test]
fn dropping_every_handle_while_running_ends_the_loop() {
    let (engines, _) = home_wins(&["s"]);
    let mut t = Tournament::new(players(4), engines, config(RoundBudget::Unbounded));
    let (handle, commands) = ControlHandle::channel(&t);
    let view = t.live_view();
    let worker = thread::spawn(move || {
        let result = run_tournament(&mut t, &commands);
        (t, result)
    });

    assert!(wait_until(TIMEOUT, || handle.rounds_run() >= 1));
    drop(handle);
    let (t, result) = worker.join().unwrap();
    result.unwrap();
    assert!(t.end_requested());
    assert_eq!(t.phase(), TournamentPhase::Ended);
    assert_eq!(view.read().unwrap().phase, TournamentPhase::Ended);
    assert_invariants(&t);
}
