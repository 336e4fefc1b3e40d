//! BotDriver command flow tests
//!
//! Every command's replies and session effects, driven through
//! `process_line` with a seeded environment and an in-memory quote store.

use std::thread;

use codebusters_core::{CipherLetter, CipherMapping, PlainLetter, Puzzle, UserId};
use codebusters_harness::SimEnv;
use codebusters_server::{
    BotAction, BotConfig, BotDriver, MemoryQuoteStore, QuoteStore, Reply, SessionEnd,
};

type Driver = BotDriver<SimEnv, MemoryQuoteStore>;

fn driver(quotes: &[&str]) -> Driver {
    BotDriver::new(
        SimEnv::with_seed(7),
        MemoryQuoteStore::with_quotes(quotes.iter().copied()),
        BotConfig::default(),
    )
}

/// "hi there" encrypted as "QZ MQXKX".
fn install_hi_there(driver: &Driver, user: &UserId) {
    let mapping: CipherMapping = "ABCDXEFQZGHIJLNOPKRMSTUVWY".parse().unwrap();
    driver.registry().insert(user.clone(), Puzzle::with_mapping("hi there", mapping));
}

fn replies(actions: &[BotAction]) -> Vec<Reply> {
    actions
        .iter()
        .filter_map(|action| match action {
            BotAction::Reply { reply, .. } => Some(reply.clone()),
            BotAction::SessionEnded { .. } => None,
        })
        .collect()
}

fn guess_view(actions: &[BotAction]) -> String {
    match replies(actions).as_slice() {
        [Reply::Puzzle(view)] => view.current_guess.clone(),
        other => panic!("expected a single puzzle view, got {other:?}"),
    }
}

fn ended(user: &UserId, reason: SessionEnd) -> BotAction {
    BotAction::SessionEnded { user_id: user.clone(), reason }
}

fn cipher(c: char) -> CipherLetter {
    CipherLetter::new(c).unwrap()
}

fn plain(c: char) -> PlainLetter {
    PlainLetter::new(c).unwrap()
}

#[test]
fn ordinary_chat_produces_nothing() {
    let driver = driver(&["hi there"]);
    let user = UserId::from("alice");

    assert!(driver.process_line(&user, "good morning").is_empty());
    assert!(driver.process_line(&user, "").is_empty());
    assert!(driver.registry().is_empty());
}

#[test]
fn new_puzzle_from_empty_store() {
    let driver = driver(&[]);
    let user = UserId::from("alice");

    let actions = driver.process_line(&user, "!newpuzzle");

    assert_eq!(replies(&actions), vec![Reply::NoQuotes]);
    assert!(!driver.registry().contains(&user));
}

#[test]
fn new_puzzle_shows_fresh_puzzle() {
    let driver = driver(&["Hi there"]);
    let user = UserId::from("alice");

    let actions = driver.process_line(&user, "!newpuzzle");

    assert_eq!(guess_view(&actions), "__ _____");
    assert_eq!(
        driver.registry().with_puzzle(&user, |p| p.plaintext().to_string()).as_deref(),
        Some("hi there")
    );
}

#[test]
fn new_puzzle_abandons_unfinished_one() {
    let driver = driver(&["hi there"]);
    let user = UserId::from("alice");

    driver.process_line(&user, "!newpuzzle");
    let actions = driver.process_line(&user, "!newpuzzle");

    assert_eq!(actions[0], ended(&user, SessionEnd::Abandoned));
    assert_eq!(driver.registry().len(), 1);
}

#[test]
fn puzzle_commands_need_a_session() {
    let driver = driver(&["hi there"]);
    let user = UserId::from("nobody");

    for line in ["!guess Q a", "!undo Q", "!clear", "!solve hi", "!hint", "!answer"] {
        let actions = driver.process_line(&user, line);
        assert_eq!(replies(&actions), vec![Reply::NoActivePuzzle], "{line}");
    }
}

#[test]
fn guess_right_and_wrong() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    let wrong = driver.process_line(&user, "!guess Q x");
    assert_eq!(
        replies(&wrong),
        vec![Reply::IncorrectGuess { cipher: cipher('Q'), plain: plain('x') }]
    );
    assert_eq!(driver.registry().with_puzzle(&user, Puzzle::revealed_count), Some(0));

    let right = driver.process_line(&user, "!guess q H");
    assert_eq!(guess_view(&right), "h_ _h___");
}

#[test]
fn final_guess_solves_and_ends_session() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    for line in ["!guess Q h", "!guess Z i", "!guess M t", "!guess X e"] {
        driver.process_line(&user, line);
    }
    let actions = driver.process_line(&user, "!guess K r");

    assert_eq!(
        actions,
        vec![
            BotAction::Reply { user_id: user.clone(), reply: Reply::Solved },
            ended(&user, SessionEnd::Solved),
        ]
    );
    assert!(!driver.registry().contains(&user));
}

#[test]
fn undo_and_clear() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    let missing = driver.process_line(&user, "!undo Q");
    assert_eq!(replies(&missing), vec![Reply::NoGuessFound { cipher: cipher('Q') }]);

    driver.process_line(&user, "!guess Q h");
    driver.process_line(&user, "!guess Z i");
    assert_eq!(guess_view(&driver.process_line(&user, "!undo q")), "_i _____");
    assert_eq!(guess_view(&driver.process_line(&user, "!clear")), "__ _____");
}

#[test]
fn solve_attempts() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    let miss = driver.process_line(&user, "!solve hi theirs");
    assert_eq!(replies(&miss), vec![Reply::SolveMismatch]);
    assert!(driver.registry().contains(&user));

    let hit = driver.process_line(&user, "!solve Hi, THERE!");
    assert_eq!(replies(&hit), vec![Reply::Solved]);
    assert_eq!(hit.last(), Some(&ended(&user, SessionEnd::Solved)));
    assert!(!driver.registry().contains(&user));
}

#[test]
fn hints_until_solved() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    for _ in 0..4 {
        let actions = driver.process_line(&user, "!hint");
        let replies = replies(&actions);
        assert!(matches!(replies.as_slice(), [Reply::Hint { .. }, Reply::Puzzle(_)]));
    }

    let last = driver.process_line(&user, "!hint");
    assert!(matches!(replies(&last).as_slice(), [Reply::Hint { .. }, Reply::Solved]));
    assert_eq!(last.last(), Some(&ended(&user, SessionEnd::Solved)));
    assert!(!driver.registry().contains(&user));
}

#[test]
fn hint_reveals_true_mapping() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);
    let expected = [('Q', 'h'), ('Z', 'i'), ('M', 't'), ('X', 'e'), ('K', 'r')];

    let actions = driver.process_line(&user, "!hint");

    let Some(Reply::Hint { cipher, plain }) = replies(&actions).first().cloned() else {
        panic!("expected a hint, got {actions:?}");
    };
    assert!(expected.contains(&(cipher.as_char(), plain.as_char())));
}

#[test]
fn hint_on_letterless_puzzle() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    let mapping: CipherMapping = "ABCDXEFQZGHIJLNOPKRMSTUVWY".parse().unwrap();
    driver.registry().insert(user.clone(), Puzzle::with_mapping("!!!", mapping));

    let actions = driver.process_line(&user, "!hint");

    assert_eq!(replies(&actions), vec![Reply::AlreadySolved]);
}

#[test]
fn answer_reveals_and_ends() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    let actions = driver.process_line(&user, "!answer");

    assert_eq!(replies(&actions), vec![Reply::Answer { plaintext: "hi there".to_string() }]);
    assert_eq!(actions.last(), Some(&ended(&user, SessionEnd::Answered)));
    assert!(!driver.registry().contains(&user));
}

#[test]
fn added_quote_becomes_playable() {
    let driver = driver(&[]);
    let user = UserId::from("alice");

    let added = driver.process_line(&user, "!addquote Veni, vidi, vici.");
    assert_eq!(replies(&added), vec![Reply::QuoteAdded]);
    assert_eq!(driver.quotes().load().unwrap(), vec!["Veni, vidi, vici."]);

    let started = driver.process_line(&user, "!newpuzzle");
    assert_eq!(guess_view(&started), "____, ____, ____.");
}

#[test]
fn syntax_errors_become_replies() {
    let driver = driver(&[]);
    let user = UserId::from("alice");
    install_hi_there(&driver, &user);

    assert_eq!(
        replies(&driver.process_line(&user, "!guess QZ h")),
        vec![Reply::InvalidGuessFormat { token: "QZ".to_string() }]
    );
    assert_eq!(
        replies(&driver.process_line(&user, "!guess")),
        vec![Reply::MissingArgument { command: "guess", argument: "CIPHER_CHAR" }]
    );
    assert_eq!(
        replies(&driver.process_line(&user, "!fly")),
        vec![Reply::UnknownCommand { name: "fly".to_string() }]
    );
    assert_eq!(replies(&driver.process_line(&user, "!help")), vec![Reply::Help]);
    assert_eq!(driver.registry().with_puzzle(&user, Puzzle::revealed_count), Some(0));
}

#[test]
fn custom_prefix() {
    let driver = BotDriver::new(
        SimEnv::with_seed(1),
        MemoryQuoteStore::with_quotes(["abc"]),
        BotConfig { command_prefix: "cb ".to_string() },
    );
    let user = UserId::from("alice");

    assert!(driver.process_line(&user, "!newpuzzle").is_empty());
    assert_eq!(guess_view(&driver.process_line(&user, "cb newpuzzle")), "___");
}

#[test]
fn users_play_independently() {
    let driver = driver(&["the quick brown fox"]);
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    driver.process_line(&alice, "!newpuzzle");
    driver.process_line(&bob, "!newpuzzle");
    driver.process_line(&alice, "!answer");

    assert!(!driver.registry().contains(&alice));
    assert!(driver.registry().contains(&bob));
    let solved = driver.process_line(&bob, "!solve The quick brown fox");
    assert_eq!(replies(&solved), vec![Reply::Solved]);
}

#[test]
fn concurrent_users_share_one_driver() {
    const USERS: u64 = 16;
    let driver = driver(&["pack my box with five dozen liquor jugs"]);

    thread::scope(|scope| {
        for id in 0..USERS {
            let driver = &driver;
            scope.spawn(move || {
                let user = UserId::from(id);
                driver.process_line(&user, "!newpuzzle");

                let mut solved = false;
                for _ in 0..26 {
                    let actions = driver.process_line(&user, "!hint");
                    if actions.contains(&ended(&user, SessionEnd::Solved)) {
                        solved = true;
                        break;
                    }
                }
                assert!(solved, "user {id} never solved");
            });
        }
    });

    assert!(driver.registry().is_empty());
}
