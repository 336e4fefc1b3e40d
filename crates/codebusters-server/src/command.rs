//! Chat command parsing.
//!
//! A command is a message that starts with the configured prefix, followed by
//! a command name and its arguments separated by whitespace. Messages without
//! the prefix are ordinary chat and parse to `None`.

use codebusters_core::{CipherLetter, PlainLetter};

use crate::error::CommandError;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a puzzle from a random stored quote.
    NewPuzzle,
    /// Guess that a cipher letter decrypts to a plain letter.
    Guess {
        /// Letter as it appears in the ciphertext
        cipher: CipherLetter,
        /// Proposed plaintext letter
        plain: PlainLetter,
    },
    /// Forget the guess for one cipher letter.
    Undo {
        /// Letter whose guess is removed
        cipher: CipherLetter,
    },
    /// Forget every guess.
    Clear,
    /// Attempt the whole phrase at once.
    Solve {
        /// Candidate plaintext as typed
        text: String,
    },
    /// Reveal one unrevealed letter.
    Hint,
    /// Reveal the plaintext and give up.
    Answer,
    /// Add a phrase to the quote store.
    AddQuote {
        /// Quote as typed
        quote: String,
    },
    /// List the commands.
    Help,
}

impl Command {
    /// Parse a chat message.
    ///
    /// Returns `Ok(None)` when the message is not addressed to the bot (no
    /// prefix, or nothing after it). Letter arguments may be given in either
    /// case and are normalized to the cipher or plain alphabet.
    pub fn parse(message: &str, prefix: &str) -> Result<Option<Self>, CommandError> {
        let Some(body) = message.strip_prefix(prefix) else {
            return Ok(None);
        };

        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let mut args = rest.split_whitespace();
        let command = match name {
            "newpuzzle" => Self::NewPuzzle,
            "guess" => {
                let cipher = args.next().ok_or(CommandError::MissingArgument {
                    command: "guess",
                    argument: "CIPHER_CHAR",
                })?;
                let plain = args.next().ok_or(CommandError::MissingArgument {
                    command: "guess",
                    argument: "PLAIN_CHAR",
                })?;

                Self::Guess {
                    cipher: parse_letter(cipher, CipherLetter::from_ascii_any_case)?,
                    plain: parse_letter(plain, PlainLetter::from_ascii_any_case)?,
                }
            },
            "undo" => {
                let cipher = args.next().ok_or(CommandError::MissingArgument {
                    command: "undo",
                    argument: "CIPHER_CHAR",
                })?;
                Self::Undo { cipher: parse_letter(cipher, CipherLetter::from_ascii_any_case)? }
            },
            "clear" => Self::Clear,
            "solve" => Self::Solve { text: required_text(rest, "solve", "FULL_PLAINTEXT")? },
            "hint" => Self::Hint,
            "answer" => Self::Answer,
            "addquote" => Self::AddQuote { quote: required_text(rest, "addquote", "QUOTE")? },
            "help" => Self::Help,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    /// Command name as typed after the prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewPuzzle => "newpuzzle",
            Self::Guess { .. } => "guess",
            Self::Undo { .. } => "undo",
            Self::Clear => "clear",
            Self::Solve { .. } => "solve",
            Self::Hint => "hint",
            Self::Answer => "answer",
            Self::AddQuote { .. } => "addquote",
            Self::Help => "help",
        }
    }
}

/// Single-character token converted with `convert`.
fn parse_letter<L>(token: &str, convert: fn(char) -> Option<L>) -> Result<L, CommandError> {
    let mut chars = token.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => convert(c),
        _ => None,
    };
    letter.ok_or_else(|| CommandError::InvalidGuessFormat { token: token.to_string() })
}

fn required_text(
    rest: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    Ok(rest.to_string())
}
