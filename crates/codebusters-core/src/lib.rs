//! Codebusters puzzle core.
//!
//! Per-user substitution-cipher puzzles: a random single-letter substitution
//! is generated for a plaintext phrase, the user reveals it letter by letter,
//! and the puzzle reports when the decryption is complete.
//!
//! # Components
//!
//! - [`CipherMapping`]: bijection between plaintext and cipher letters
//! - [`Puzzle`]: one plaintext, its mapping, and the letters revealed so far
//! - [`PuzzleRegistry`]: one active puzzle per user, safe to share across
//!   threads
//! - [`Environment`]: injected randomness, so tests can replay a seed
//!
//! Nothing in this crate performs I/O. Command parsing, rendering and the quote
//! database live in `codebusters-server`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cipher;
pub mod env;
pub mod letter;
pub mod puzzle;
pub mod registry;

pub use cipher::{CipherError, CipherMapping};
pub use env::Environment;
pub use letter::{ALPHABET_LEN, CipherLetter, LetterError, PlainLetter};
pub use puzzle::Puzzle;
pub use registry::{PuzzleRegistry, UserId};
