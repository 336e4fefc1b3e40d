//! Text rendering of driver replies.
//!
//! The driver decides *what* to tell a user; [`Presenter`] decides how it
//! reads. Output is Markdown-flavoured plain text that displays well both in a
//! terminal and in chat clients.

use codebusters_core::{CipherLetter, Puzzle};

use crate::driver::Reply;

/// Snapshot of a puzzle for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleView {
    /// Encrypted phrase.
    pub ciphertext: String,
    /// Progress, `_` for letters not yet revealed.
    pub current_guess: String,
    /// Occurrences of each cipher letter, sorted by letter.
    pub frequencies: Vec<(CipherLetter, usize)>,
}

impl PuzzleView {
    /// Capture the displayable state of `puzzle`.
    pub fn of(puzzle: &Puzzle) -> Self {
        Self {
            ciphertext: puzzle.ciphertext().to_string(),
            current_guess: puzzle.current_guess(),
            frequencies: puzzle.letter_frequencies(),
        }
    }
}

/// Usage line and description for every command, in help order.
const COMMANDS: &[(&str, &str)] = &[
    ("newpuzzle", "Starts a new puzzle from the existing quote database."),
    (
        "guess <CIPHER_CHAR> <PLAIN_CHAR>",
        "Guess that the cipher letter maps to the plain letter. Example: `{p}guess Q a`.",
    ),
    ("undo <CIPHER_CHAR>", "Removes your guess for the cipher letter. Example: `{p}undo Q`."),
    ("clear", "Clears all of your current letter guesses for the puzzle."),
    (
        "solve <FULL_PLAINTEXT>",
        "Attempts the whole phrase at once. Example: `{p}solve four score and seven years ago`.",
    ),
    ("hint", "Reveals a single random letter from the unguessed ciphertext."),
    ("answer", "Reveals the entire plaintext and ends the current puzzle (like giving up)."),
    (
        "addquote <QUOTE>",
        "Adds a new quote to the quote database. Example: `{p}addquote Veni, vidi, vici.`",
    ),
    ("help", "Displays this help message."),
];

/// Turns replies into user-facing text.
#[derive(Debug, Clone)]
pub struct Presenter {
    prefix: String,
}

impl Presenter {
    /// Presenter that quotes commands with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Render one reply.
    pub fn render(&self, reply: &Reply) -> String {
        let p = &self.prefix;
        match reply {
            Reply::Puzzle(view) => render_puzzle(view),
            Reply::Solved => "Congratulations! You've correctly solved the entire puzzle!".into(),
            Reply::IncorrectGuess { cipher, plain } => {
                format!("Incorrect guess: **{cipher}** does not map to **{plain}**.")
            },
            Reply::NoGuessFound { cipher } => format!("No guess found for **{cipher}**."),
            Reply::SolveMismatch => "Sorry, that guess doesn't match the actual solution.".into(),
            Reply::Hint { cipher, plain } => {
                format!("Here's a hint: **{cipher}** maps to **{plain}**.")
            },
            Reply::AlreadySolved => "Puzzle is already solved!".into(),
            Reply::NothingToHint => {
                "All letters have been revealed or there's nothing to hint.".into()
            },
            Reply::Answer { plaintext } => format!("The full answer was:\n\n**{plaintext}**"),
            Reply::QuoteAdded => "Quote added successfully!".into(),
            Reply::Help => self.render_help(),
            Reply::NoActivePuzzle => {
                format!("No active puzzle! Use {p}newpuzzle to start one.")
            },
            Reply::NoQuotes => "No quotes available in the database!".into(),
            Reply::InvalidGuessFormat { token } => {
                format!("Invalid letter `{token}`: give a single letter, e.g. `{p}guess Q a`.")
            },
            Reply::UnknownCommand { name } => {
                format!("Unknown command `{p}{name}`. Use {p}help to list commands.")
            },
            Reply::MissingArgument { command, argument } => {
                format!("Missing <{argument}>. Usage: `{p}{}`", usage(command))
            },
            Reply::StorageFailure => "The quote database is unavailable right now.".into(),
        }
    }

    fn render_help(&self) -> String {
        let mut out = String::from("**Codebusters Bot Commands**\n");
        for (usage, description) in COMMANDS {
            let description = description.replace("{p}", &self.prefix);
            out.push_str(&format!("\n**{}{usage}**\n{description}\n", self.prefix));
        }
        out
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new("!")
    }
}

/// Usage line for `command`, or the bare name if it takes no arguments.
fn usage(command: &str) -> &str {
    COMMANDS
        .iter()
        .map(|(usage, _)| *usage)
        .find(|usage| usage.split(' ').next() == Some(command))
        .unwrap_or(command)
}

fn render_puzzle(view: &PuzzleView) -> String {
    let frequencies = view
        .frequencies
        .iter()
        .map(|(letter, count)| format!("{letter}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "**Codebusters Puzzle**\n\
         Cipher Text\n```\n{}\n```\n\
         Your Guess\n```\n{}\n```\n\
         Ciphertext Frequency\n```\n{frequencies}\n```",
        view.ciphertext, view.current_guess,
    )
}
