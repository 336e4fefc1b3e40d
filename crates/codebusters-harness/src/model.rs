//! Reference model for model-based testing.
//!
//! [`ModelPuzzle`] keeps the mapping as a plain list of `(plain, cipher)` char
//! pairs, finds inverses by linear scan and stores guesses in a char map. It
//! is slow and untyped on purpose: it states the puzzle rules as directly as
//! possible so the real `Puzzle` can be checked against it.

use std::collections::{BTreeMap, BTreeSet};

use arbitrary::Arbitrary;
use codebusters_core::{CipherLetter, CipherMapping, Environment, PlainLetter, Puzzle};

/// Reference puzzle.
#[derive(Debug, Clone)]
pub struct ModelPuzzle {
    /// Lowercased plaintext.
    plaintext: String,
    /// `(plain, cipher)` for every letter.
    mapping: Vec<(char, char)>,
    /// Cipher char → plain char for confirmed guesses.
    guesses: BTreeMap<char, char>,
}

impl ModelPuzzle {
    /// Model of a puzzle built with `Puzzle::with_mapping(plaintext, mapping)`.
    pub fn new(plaintext: &str, mapping: &CipherMapping) -> Self {
        let mapping = PlainLetter::ALL
            .into_iter()
            .zip(mapping.cipher_alphabet())
            .map(|(plain, cipher)| (plain.as_char(), cipher.as_char()))
            .collect();

        Self { plaintext: plaintext.to_lowercase(), mapping, guesses: BTreeMap::new() }
    }

    /// Encrypted phrase.
    pub fn ciphertext(&self) -> String {
        self.plaintext
            .chars()
            .map(|c| {
                self.mapping.iter().find(|(plain, _)| *plain == c).map_or(c, |(_, cipher)| *cipher)
            })
            .collect()
    }

    /// Progress string, `_` for unknown letters.
    pub fn current_guess(&self) -> String {
        self.ciphertext()
            .chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    self.guesses.get(&c).copied().unwrap_or('_')
                } else {
                    c
                }
            })
            .collect()
    }

    /// Record `cipher → plain` if it is the true mapping.
    pub fn guess(&mut self, cipher: char, plain: char) -> bool {
        if !(cipher.is_ascii_uppercase() && plain.is_ascii_lowercase()) {
            return false;
        }

        match self.mapping.iter().find(|(_, mapped)| *mapped == cipher) {
            Some((real, _)) if *real == plain => {
                self.guesses.insert(cipher, plain);
                true
            },
            _ => false,
        }
    }

    /// Remove a guess.
    pub fn undo(&mut self, cipher: char) -> bool {
        self.guesses.remove(&cipher).is_some()
    }

    /// Remove every guess.
    pub fn clear(&mut self) {
        self.guesses.clear();
    }

    /// Guess spells out the plaintext.
    pub fn is_solved(&self) -> bool {
        self.current_guess() == self.plaintext
    }

    /// Cipher letters in the ciphertext without a guess.
    pub fn unrevealed(&self) -> BTreeSet<char> {
        self.ciphertext()
            .chars()
            .filter(|c| c.is_ascii_uppercase() && !self.guesses.contains_key(c))
            .collect()
    }

    /// Confirmed guesses.
    pub fn guesses(&self) -> &BTreeMap<char, char> {
        &self.guesses
    }
}

/// Operations applied to both the model and the real puzzle.
///
/// Letters are raw bytes so malformed input (lowercase cipher letters, digits,
/// Latin-1 symbols) is generated as often as valid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Guess that one byte-as-char decrypts to another.
    Guess {
        /// Cipher side
        cipher: u8,
        /// Plain side
        plain: u8,
    },
    /// Undo the guess for a byte-as-char.
    Undo {
        /// Cipher side
        cipher: u8,
    },
    /// Clear all guesses.
    Clear,
    /// Ask the real puzzle for a hint and mirror it into the model.
    Hint,
}

/// The real puzzle disagreed with the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Operation that exposed the difference.
    pub operation: Operation,
    /// What differed.
    pub detail: String,
}

impl Operation {
    /// Apply to both sides and compare the observable state afterwards.
    pub fn apply<E: Environment>(
        self,
        puzzle: &mut Puzzle,
        model: &mut ModelPuzzle,
        env: &E,
    ) -> Result<(), Divergence> {
        let diverged = |detail: String| Divergence { operation: self, detail };

        match self {
            Self::Guess { cipher, plain } => {
                let (cipher, plain) = (char::from(cipher), char::from(plain));
                let real = puzzle.make_guess_chars(cipher, plain);
                let expected = model.guess(cipher, plain);
                if real != expected {
                    return Err(diverged(format!("guess returned {real}, model {expected}")));
                }
            },
            Self::Undo { cipher } => {
                let cipher = char::from(cipher);
                let real = CipherLetter::new(cipher).is_some_and(|c| puzzle.undo_guess(c));
                let expected = model.undo(cipher);
                if real != expected {
                    return Err(diverged(format!("undo returned {real}, model {expected}")));
                }
            },
            Self::Clear => {
                puzzle.clear_guesses();
                model.clear();
            },
            Self::Hint => {
                let unrevealed = model.unrevealed();
                match puzzle.give_hint(env) {
                    Some((cipher, plain)) => {
                        let cipher = cipher.as_char();
                        if !unrevealed.contains(&cipher) {
                            return Err(diverged(format!("hint chose {cipher}, not unrevealed")));
                        }
                        if !model.guess(cipher, plain.as_char()) {
                            return Err(diverged(format!("hint {cipher}={plain} is wrong")));
                        }
                    },
                    None if !unrevealed.is_empty() => {
                        return Err(diverged(format!("no hint, model has {unrevealed:?}")));
                    },
                    None => {},
                }
            },
        }

        compare(puzzle, model).map_err(diverged)
    }
}

/// Compare everything a user can observe.
pub fn compare(puzzle: &Puzzle, model: &ModelPuzzle) -> Result<(), String> {
    if puzzle.ciphertext() != model.ciphertext() {
        return Err(format!("ciphertext {:?} vs {:?}", puzzle.ciphertext(), model.ciphertext()));
    }

    let (real, expected) = (puzzle.current_guess(), model.current_guess());
    if real != expected {
        return Err(format!("current guess {real:?} vs {expected:?}"));
    }

    let revealed: BTreeMap<char, char> =
        puzzle.revealed().map(|(cipher, plain)| (cipher.as_char(), plain.as_char())).collect();
    if &revealed != model.guesses() {
        return Err(format!("revealed {revealed:?} vs {:?}", model.guesses()));
    }

    if puzzle.is_solved() != model.is_solved() {
        return Err(format!("solved {} vs {}", puzzle.is_solved(), model.is_solved()));
    }

    Ok(())
}
