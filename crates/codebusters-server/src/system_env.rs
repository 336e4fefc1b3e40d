//! Production Environment implementation using the OS RNG.
//!
//! `SystemEnv` draws every byte from getrandom, so ciphers, hints and quote
//! picks are unpredictable and not reproducible. Tests use the harness's
//! seeded `SimEnv` instead.

use codebusters_core::Environment;

/// Production environment backed by getrandom.
///
/// # Panics
///
/// Panics if the OS RNG fails. RNG failure indicates an OS-level problem and
/// there is no sensible fallback source of randomness.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}
