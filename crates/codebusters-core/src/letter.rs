//! Typed letters for the two alphabets of a substitution cipher.
//!
//! Plaintext letters are lowercase `a`-`z`, cipher letters are uppercase
//! `A`-`Z`. They are distinct types so a guess can never swap the two sides,
//! and malformed input is rejected where it is parsed instead of inside the
//! puzzle.
//!
//! Only ASCII letters belong to either alphabet. Any other character, including
//! non-ASCII alphabetic ones, is treated like punctuation by the puzzle.

use std::fmt;

use thiserror::Error;

/// Number of letters in each alphabet.
pub const ALPHABET_LEN: usize = 26;

/// Errors from converting a `char` into a letter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterError {
    /// Expected a lowercase ASCII letter.
    #[error("not a plaintext letter (a-z): {0:?}")]
    NotPlain(char),

    /// Expected an uppercase ASCII letter.
    #[error("not a cipher letter (A-Z): {0:?}")]
    NotCipher(char),
}

macro_rules! letter {
    (
        $(#[$meta:meta])*
        $name:ident, base = $base:literal, case = $case:ident, error = $error:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u8);

        impl $name {
            /// All 26 letters in alphabetical order.
            pub const ALL: [Self; ALPHABET_LEN] = {
                let mut all = [Self(0); ALPHABET_LEN];
                let mut i = 0;
                while i < ALPHABET_LEN {
                    all[i] = Self(i as u8);
                    i += 1;
                }
                all
            };

            /// Letter from a char in this alphabet's case. `None` otherwise.
            pub fn new(c: char) -> Option<Self> {
                let offset = u8::try_from(c).ok()?.checked_sub($base)?;
                (usize::from(offset) < ALPHABET_LEN).then_some(Self(offset))
            }

            /// Letter from an ASCII letter of either case.
            pub fn from_ascii_any_case(c: char) -> Option<Self> {
                Self::new(c.$case())
            }

            /// Letter at `index` in the alphabet (`0` is `a`/`A`).
            pub fn from_index(index: usize) -> Option<Self> {
                (index < ALPHABET_LEN).then(|| Self(index as u8))
            }

            /// Position in the alphabet, `0..26`.
            pub fn index(self) -> usize {
                usize::from(self.0)
            }

            /// The letter as a `char` in this alphabet's case.
            pub fn as_char(self) -> char {
                char::from($base + self.0)
            }
        }

        impl TryFrom<char> for $name {
            type Error = LetterError;

            fn try_from(c: char) -> Result<Self, Self::Error> {
                Self::new(c).ok_or(LetterError::$error(c))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_char())
            }
        }
    };
}

letter! {
    /// A plaintext letter, `a`-`z`.
    PlainLetter, base = b'a', case = to_ascii_lowercase, error = NotPlain
}

letter! {
    /// A cipher letter, `A`-`Z`.
    CipherLetter, base = b'A', case = to_ascii_uppercase, error = NotCipher
}
