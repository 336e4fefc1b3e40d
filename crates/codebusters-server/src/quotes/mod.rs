//! Quote database.
//!
//! Trait-based abstraction over the list of phrases puzzles are drawn from.
//! Like the rest of the crate the trait is synchronous; the console runtime
//! only touches it from inside a command.

mod error;
mod json;
mod memory;

pub use error::StorageError;
pub use json::JsonQuoteStore;
pub use memory::MemoryQuoteStore;
use codebusters_core::Environment;
use rand::seq::SliceRandom;

/// Source of puzzle plaintexts.
///
/// Must be Clone (shared between the driver and tests), Send + Sync
/// (thread-safe) and synchronous. Implementations share state through `Arc`,
/// so clones see the same quotes.
///
/// # Panics
///
/// Implementations may panic if an internal mutex is poisoned.
pub trait QuoteStore: Clone + Send + Sync + 'static {
    /// Every stored quote, in insertion order.
    fn load(&self) -> Result<Vec<String>, StorageError>;

    /// Add a quote to the end of the store.
    ///
    /// # Invariants
    ///
    /// - Post: the next `load` ends with `quote`
    fn append(&self, quote: String) -> Result<(), StorageError>;

    /// Uniformly random quote. `None` if the store is empty.
    fn pick_random<E: Environment>(&self, env: &E) -> Result<Option<String>, StorageError> {
        let quotes = self.load()?;
        Ok(quotes.choose(&mut env.rng()).cloned())
    }

    /// Number of stored quotes.
    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.load()?.len())
    }

    /// Whether the store holds no quotes.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}
