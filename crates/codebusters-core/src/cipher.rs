//! Single-letter substitution cipher.
//!
//! A [`CipherMapping`] stores the forward table (plain → cipher) and the
//! inverse table (cipher → plain) side by side. Both are filled from the same
//! permutation when the mapping is built and never change afterwards, so every
//! lookup in either direction is a table index and the mapping stays a
//! bijection for its whole lifetime.

use std::str::FromStr;

use rand::seq::SliceRandom;
use thiserror::Error;

use crate::{
    env::Environment,
    letter::{ALPHABET_LEN, CipherLetter, LetterError, PlainLetter},
};

/// Errors from building a mapping out of an explicit cipher alphabet.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// The cipher alphabet did not have exactly 26 letters.
    #[error("cipher alphabet must have 26 letters, got {0}")]
    WrongLength(usize),

    /// A character in the cipher alphabet was not an uppercase letter.
    #[error("invalid cipher alphabet: {0}")]
    Letter(#[from] LetterError),

    /// Two plaintext letters were assigned the same cipher letter.
    #[error("cipher letter {cipher} assigned to both {first} and {second}")]
    DuplicateCipherLetter {
        /// The cipher letter used twice
        cipher: CipherLetter,
        /// First plaintext letter it was assigned to
        first: PlainLetter,
        /// Second plaintext letter it was assigned to
        second: PlainLetter,
    },
}

/// Bijection between the 26 plaintext letters and the 26 cipher letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherMapping {
    /// Indexed by plaintext letter.
    forward: [CipherLetter; ALPHABET_LEN],
    /// Indexed by cipher letter.
    inverse: [PlainLetter; ALPHABET_LEN],
}

impl CipherMapping {
    /// Uniformly random mapping.
    ///
    /// Shuffles the cipher alphabet rather than drawing each letter
    /// independently, so the result is a permutation by construction.
    pub fn generate<E: Environment>(env: &E) -> Self {
        let mut alphabet = CipherLetter::ALL;
        alphabet.shuffle(&mut env.rng());
        Self::from_permutation(alphabet)
    }

    /// Mapping from an explicit cipher alphabet.
    ///
    /// Entry `i` is the cipher letter for plaintext letter `i`, so
    /// `"QWERTYUIOPASDFGHJKLZXCVBNM"` maps `a → Q`, `b → W` and so on.
    /// Fails if any cipher letter is used twice.
    pub fn from_cipher_alphabet(
        alphabet: [CipherLetter; ALPHABET_LEN],
    ) -> Result<Self, CipherError> {
        let mut assigned: [Option<PlainLetter>; ALPHABET_LEN] = [None; ALPHABET_LEN];

        for (plain, cipher) in PlainLetter::ALL.into_iter().zip(alphabet) {
            if let Some(first) = assigned[cipher.index()] {
                return Err(CipherError::DuplicateCipherLetter { cipher, first, second: plain });
            }
            assigned[cipher.index()] = Some(plain);
        }

        Ok(Self::from_permutation(alphabet))
    }

    /// Caller guarantees `forward` is a permutation.
    fn from_permutation(forward: [CipherLetter; ALPHABET_LEN]) -> Self {
        let mut inverse = PlainLetter::ALL;
        for (plain, cipher) in PlainLetter::ALL.into_iter().zip(forward) {
            inverse[cipher.index()] = plain;
        }

        Self { forward, inverse }
    }

    /// Cipher letter for a plaintext letter.
    pub fn encode_letter(&self, plain: PlainLetter) -> CipherLetter {
        self.forward[plain.index()]
    }

    /// Plaintext letter for a cipher letter.
    pub fn plain_for(&self, cipher: CipherLetter) -> PlainLetter {
        self.inverse[cipher.index()]
    }

    /// Inverse lookup on a raw char.
    ///
    /// `None` unless `c` is one of the 26 uppercase cipher letters.
    pub fn plain_for_char(&self, c: char) -> Option<PlainLetter> {
        CipherLetter::new(c).map(|cipher| self.plain_for(cipher))
    }

    /// Encode one character.
    ///
    /// ASCII letters of either case map to their uppercase cipher letter.
    /// Everything else passes through unchanged.
    pub fn encode(&self, c: char) -> char {
        match PlainLetter::from_ascii_any_case(c) {
            Some(plain) => self.encode_letter(plain).as_char(),
            None => c,
        }
    }

    /// The cipher alphabet, indexed by plaintext letter.
    pub fn cipher_alphabet(&self) -> [CipherLetter; ALPHABET_LEN] {
        self.forward
    }
}

impl FromStr for CipherMapping {
    type Err = CipherError;

    /// Parse a 26-letter uppercase cipher alphabet.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s.chars().map(CipherLetter::try_from).collect::<Result<Vec<_>, _>>()?;
        let alphabet: [CipherLetter; ALPHABET_LEN] =
            letters.try_into().map_err(|letters: Vec<_>| CipherError::WrongLength(letters.len()))?;

        Self::from_cipher_alphabet(alphabet)
    }
}
