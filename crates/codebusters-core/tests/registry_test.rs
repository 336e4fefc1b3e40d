//! PuzzleRegistry behavior tests
//!
//! Session lifecycle and isolation between users, including concurrent access
//! from many threads.

use std::{
    sync::{Barrier, mpsc},
    thread,
    time::Duration,
};

use codebusters_core::{CipherLetter, PlainLetter, Puzzle, PuzzleRegistry, UserId};
use codebusters_harness::SimEnv;

#[test]
fn session_lifecycle() {
    let env = SimEnv::with_seed(1);
    let registry = PuzzleRegistry::new();
    let user = UserId::from(1_331_369_560_716_218_428u64);

    assert!(!registry.contains(&user));

    let started = registry.start(user.clone(), "To be or not to be", &env);
    assert_eq!(started.plaintext(), "to be or not to be");

    let hint = registry.with_puzzle_mut(&user, |p| p.give_hint(&env)).flatten();
    let (cipher, plain) = hint.unwrap();
    let revealed = registry.with_puzzle(&user, |p| p.revealed().collect::<Vec<_>>());
    assert_eq!(revealed, Some(vec![(cipher, plain)]));

    let ended = registry.end(&user).unwrap();
    assert_eq!(ended.revealed_count(), 1);
    assert!(registry.is_empty());
}

#[test]
fn new_puzzle_abandons_progress() {
    let env = SimEnv::with_seed(2);
    let registry = PuzzleRegistry::new();
    let user = UserId::from("carol");

    registry.start(user.clone(), "abc", &env);
    registry.with_puzzle_mut(&user, |p| while p.give_hint(&env).is_some() {});
    registry.start(user.clone(), "abc", &env);

    assert_eq!(registry.with_puzzle(&user, Puzzle::revealed_count), Some(0));
}

#[test]
fn concurrent_sessions_for_distinct_users() {
    const USERS: u64 = 32;

    let registry = PuzzleRegistry::new();
    let barrier = Barrier::new(USERS as usize);

    thread::scope(|scope| {
        for id in 0..USERS {
            let registry = registry.clone();
            let barrier = &barrier;
            scope.spawn(move || {
                let env = SimEnv::with_seed(id);
                let user = UserId::from(id);

                barrier.wait();
                registry.start(user.clone(), "the quick brown fox", &env);
                registry.with_puzzle_mut(&user, |p| while p.give_hint(&env).is_some() {});
                assert_eq!(registry.with_puzzle(&user, Puzzle::is_solved), Some(true));

                // Odd users finish and leave, even users stay
                if id % 2 == 1 {
                    assert!(registry.end(&user).is_some());
                }
            });
        }
    });

    assert_eq!(registry.len(), (USERS / 2) as usize);
    for id in 0..USERS {
        assert_eq!(registry.contains(&UserId::from(id)), id % 2 == 0);
    }
}

#[test]
fn concurrent_guesses_for_same_user_serialize() {
    let registry = PuzzleRegistry::new();
    let user = UserId::from("dave");
    let puzzle = Puzzle::with_mapping(
        "abcdefghijklmnopqrstuvwxyz",
        "QWERTYUIOPASDFGHJKLZXCVBNM".parse().unwrap(),
    );
    registry.insert(user.clone(), puzzle);

    thread::scope(|scope| {
        let alphabet = "QWERTYUIOPASDFGHJKLZXCVBNM".chars();
        for (plain, cipher) in PlainLetter::ALL.into_iter().zip(alphabet) {
            let registry = &registry;
            let user = &user;
            scope.spawn(move || {
                let cipher = CipherLetter::new(cipher).unwrap();
                let accepted = registry.with_puzzle_mut(user, |p| p.make_guess(cipher, plain));
                assert_eq!(accepted, Some(true));
            });
        }
    });

    assert_eq!(registry.with_puzzle(&user, Puzzle::revealed_count), Some(26));
    assert_eq!(registry.with_puzzle(&user, Puzzle::is_solved), Some(true));
}

#[test]
fn pending_end_does_not_block_other_users() {
    let env = SimEnv::with_seed(5);
    let registry = PuzzleRegistry::new();
    let (erin, frank) = (UserId::from("erin"), UserId::from("frank"));
    registry.start(erin.clone(), "abc", &env);
    registry.with_puzzle_mut(&erin, |p| while p.give_hint(&env).is_some() {});

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    thread::scope(|scope| {
        let (registry, erin) = (&registry, &erin);
        let holder = scope.spawn(move || {
            registry.with_puzzle_mut(erin, |_| {
                held_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        });
        held_rx.recv().unwrap();

        // Waits on erin's puzzle
        let ender = scope.spawn(move || registry.end_if(erin, Puzzle::is_solved));
        thread::sleep(Duration::from_millis(50));

        registry.start(frank.clone(), "xyz", &env);
        assert!(registry.contains(&frank));
        assert_eq!(registry.len(), 2);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        assert!(ender.join().unwrap().is_some());
    });

    assert!(!registry.contains(&erin));
    assert!(registry.contains(&frank));
}

#[test]
fn end_if_keeps_replacement_session() {
    let env = SimEnv::with_seed(6);
    let registry = PuzzleRegistry::new();
    let user = UserId::from("grace");
    registry.start(user.clone(), "abc", &env);
    registry.with_puzzle_mut(&user, |p| while p.give_hint(&env).is_some() {});

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    thread::scope(|scope| {
        let (registry, user, env) = (&registry, &user, &env);
        let holder = scope.spawn(move || {
            registry.with_puzzle_mut(user, |_| {
                held_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        });
        held_rx.recv().unwrap();

        let ender = scope.spawn(move || registry.end_if(user, Puzzle::is_solved));
        thread::sleep(Duration::from_millis(50));

        // A new puzzle replaces the solved one while the end is pending
        let replacer =
            scope.spawn(move || registry.insert(user.clone(), Puzzle::new("fresh start", env)));
        while registry.with_puzzle(user, |p| p.plaintext() == "fresh start") != Some(true) {
            thread::yield_now();
        }

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        assert!(ender.join().unwrap().is_none());
        let abandoned = replacer.join().unwrap().unwrap();
        assert_eq!(abandoned.plaintext(), "abc");
    });

    assert_eq!(registry.with_puzzle(&user, Puzzle::is_solved), Some(false));
    assert_eq!(
        registry.with_puzzle(&user, |p| p.plaintext().to_string()).as_deref(),
        Some("fresh start")
    );
}
