//! Environment abstraction for deterministic testing.
//!
//! Decouples puzzle logic from the system RNG. Production code uses OS
//! randomness, tests use a seeded generator so a failing case can be replayed.

use rand::{SeedableRng, rngs::StdRng};

/// Source of randomness for cipher generation, hints and quote selection.
///
/// # Invariants
///
/// - Given the same seed, a simulated environment produces the same sequence
///   of bytes
/// - Methods are infallible except in exceptional circumstances (e.g. OS
///   entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Fresh RNG seeded from this environment.
    ///
    /// Used with `rand::seq::SliceRandom` for shuffles and uniform choice.
    /// Each call consumes 32 bytes of the environment's stream.
    fn rng(&self) -> StdRng {
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        self.random_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}
