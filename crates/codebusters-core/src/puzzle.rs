//! Puzzle state machine.
//!
//! A puzzle is in progress until its current guess equals the plaintext, at
//! which point it is solved. The only mutable state is the set of revealed
//! letters, and every entry in it is checked against the true mapping before it
//! is stored. An incorrect guess is rejected outright, so the revealed set can
//! never contradict the cipher.
//!
//! # Invariants
//!
//! - `revealed[c] == mapping.plain_for(c)` for every revealed `c`
//! - `ciphertext` is fixed for the puzzle's lifetime
//! - `is_solved()` iff `current_guess() == plaintext()`

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;

use crate::{
    cipher::CipherMapping,
    env::Environment,
    letter::{CipherLetter, PlainLetter},
};

/// Shown in the current guess for letters that are not yet revealed.
pub const PLACEHOLDER: char = '_';

/// One user's substitution-cipher puzzle.
#[derive(Debug, Clone)]
pub struct Puzzle {
    /// Lowercased plaintext, punctuation and spacing preserved
    plaintext: String,
    /// Plaintext run through the mapping
    ciphertext: String,
    /// Secret mapping, immutable after construction
    mapping: CipherMapping,
    /// Cipher letters whose plaintext letter the user has found
    revealed: BTreeMap<CipherLetter, PlainLetter>,
}

impl Puzzle {
    /// New puzzle with a freshly generated mapping.
    pub fn new<E: Environment>(plaintext: &str, env: &E) -> Self {
        Self::with_mapping(plaintext, CipherMapping::generate(env))
    }

    /// New puzzle with a known mapping.
    pub fn with_mapping(plaintext: &str, mapping: CipherMapping) -> Self {
        let plaintext = plaintext.to_lowercase();
        let ciphertext = plaintext.chars().map(|c| mapping.encode(c)).collect();

        Self { plaintext, ciphertext, mapping, revealed: BTreeMap::new() }
    }

    /// The lowercased plaintext.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// The encrypted phrase. Letters are uppercase, everything else is copied
    /// from the plaintext.
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// The user's progress, laid out exactly like the ciphertext.
    ///
    /// Revealed cipher letters show their plaintext letter, unrevealed ones
    /// show [`PLACEHOLDER`], and non-letters are copied unchanged.
    pub fn current_guess(&self) -> String {
        self.ciphertext
            .chars()
            .map(|c| match CipherLetter::new(c) {
                Some(cipher) => self.revealed.get(&cipher).map_or(PLACEHOLDER, |p| p.as_char()),
                None => c,
            })
            .collect()
    }

    /// Guess that `cipher` decrypts to `plain`.
    ///
    /// A correct guess is recorded and returns `true`. A wrong guess returns
    /// `false` and leaves the puzzle untouched.
    pub fn make_guess(&mut self, cipher: CipherLetter, plain: PlainLetter) -> bool {
        if self.mapping.plain_for(cipher) != plain {
            tracing::trace!(%cipher, %plain, "guess rejected");
            return false;
        }

        self.revealed.insert(cipher, plain);
        tracing::trace!(%cipher, %plain, "guess accepted");
        true
    }

    /// [`Self::make_guess`] on raw chars using the command-line convention:
    /// the cipher letter uppercase and the plain letter lowercase.
    ///
    /// Malformed input is indistinguishable from a wrong guess and returns
    /// `false`.
    pub fn make_guess_chars(&mut self, cipher: char, plain: char) -> bool {
        match (CipherLetter::new(cipher), PlainLetter::new(plain)) {
            (Some(cipher), Some(plain)) => self.make_guess(cipher, plain),
            _ => false,
        }
    }

    /// Forget the guess for `cipher`. Returns `true` if there was one.
    pub fn undo_guess(&mut self, cipher: CipherLetter) -> bool {
        self.revealed.remove(&cipher).is_some()
    }

    /// Forget every guess.
    pub fn clear_guesses(&mut self) {
        self.revealed.clear();
    }

    /// `true` when the current guess spells out the plaintext exactly.
    pub fn is_solved(&self) -> bool {
        self.current_guess() == self.plaintext
    }

    /// Reveal one random unrevealed letter.
    ///
    /// Picks uniformly among the distinct cipher letters that occur in the
    /// ciphertext and are not yet revealed. Returns `None` when there is
    /// nothing left to reveal.
    pub fn give_hint<E: Environment>(&mut self, env: &E) -> Option<(CipherLetter, PlainLetter)> {
        let unrevealed: Vec<CipherLetter> = self
            .occurring_letters()
            .into_iter()
            .filter(|cipher| !self.revealed.contains_key(cipher))
            .collect();

        let cipher = *unrevealed.choose(&mut env.rng())?;
        let plain = self.mapping.plain_for(cipher);
        self.revealed.insert(cipher, plain);

        tracing::trace!(%cipher, %plain, remaining = unrevealed.len() - 1, "hint revealed");
        Some((cipher, plain))
    }

    /// Check a whole-phrase answer.
    ///
    /// Case and every non-alphanumeric character are ignored on both sides.
    /// Does not touch the revealed letters.
    pub fn solve_attempt(&self, candidate: &str) -> bool {
        normalize(candidate) == normalize(&self.plaintext)
    }

    /// Revealed letters, ordered by cipher letter.
    pub fn revealed(&self) -> impl Iterator<Item = (CipherLetter, PlainLetter)> + '_ {
        self.revealed.iter().map(|(cipher, plain)| (*cipher, *plain))
    }

    /// Number of revealed letters.
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Distinct cipher letters that occur in the ciphertext.
    pub fn occurring_letters(&self) -> BTreeSet<CipherLetter> {
        self.ciphertext.chars().filter_map(CipherLetter::new).collect()
    }

    /// How often each cipher letter occurs in the ciphertext, sorted by letter.
    pub fn letter_frequencies(&self) -> Vec<(CipherLetter, usize)> {
        let mut counts = BTreeMap::new();
        for cipher in self.ciphertext.chars().filter_map(CipherLetter::new) {
            *counts.entry(cipher).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}

fn normalize(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}
