//! Fuzz target for chat command parsing and dispatch
//!
//! # Strategy
//!
//! - Raw lines: arbitrary UTF-8, with and without the prefix
//! - Prefixed keywords: known command names followed by arbitrary arguments
//! - Multiple users: lines routed to a handful of user IDs
//!
//! # Invariants
//!
//! - Parsing NEVER panics
//! - Lines without the prefix parse to `None` and produce no actions
//! - Every parsed command round-trips its name
//! - Every line produces at most one session end per user

#![no_main]

use arbitrary::Arbitrary;
use codebusters_core::UserId;
use codebusters_harness::SimEnv;
use codebusters_server::{BotAction, BotConfig, BotDriver, Command, MemoryQuoteStore};
use libfuzzer_sys::fuzz_target;

const KEYWORDS: &[&str] =
    &["newpuzzle", "guess", "undo", "clear", "solve", "hint", "answer", "addquote", "help"];

#[derive(Debug, Arbitrary)]
struct Scenario {
    seed: u64,
    lines: Vec<FuzzedLine>,
}

#[derive(Debug, Arbitrary)]
struct FuzzedLine {
    user: u8,
    shape: LineShape,
}

#[derive(Debug, Arbitrary)]
enum LineShape {
    Raw(String),
    Keyword { keyword: u8, args: String },
}

impl FuzzedLine {
    fn text(&self) -> String {
        match &self.shape {
            LineShape::Raw(text) => text.clone(),
            LineShape::Keyword { keyword, args } => {
                let keyword = KEYWORDS[usize::from(*keyword) % KEYWORDS.len()];
                format!("!{keyword} {args}")
            },
        }
    }
}

fuzz_target!(|scenario: Scenario| {
    let quotes = MemoryQuoteStore::with_quotes(["hi there", "Veni, vidi, vici.", "!!!"]);
    let driver = BotDriver::new(SimEnv::with_seed(scenario.seed), quotes, BotConfig::default());

    for line in &scenario.lines {
        let text = line.text();
        let user = UserId::from(u64::from(line.user % 4));

        match Command::parse(&text, "!") {
            Ok(Some(command)) => {
                let name = command.name();
                assert!(text.starts_with(&format!("!{name}")), "{text:?} parsed as {name}");
            },
            Ok(None) | Err(_) => {},
        }

        let actions = driver.process_line(&user, &text);
        if !text.starts_with('!') {
            assert!(actions.is_empty(), "unprefixed line produced {actions:?}");
        }

        let ends = actions.iter().filter(|a| matches!(a, BotAction::SessionEnded { .. })).count();
        assert!(ends <= 1, "{ends} session ends for {text:?}");
    }
});
