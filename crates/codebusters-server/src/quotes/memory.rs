#![allow(clippy::expect_used, reason = "Mutex poisoning is unrecoverable")]

use std::sync::{Arc, Mutex};

use super::{QuoteStore, StorageError};

/// In-memory quote store for tests and ephemeral runs.
///
/// Quotes live in an `Arc<Mutex<Vec<_>>>`, so clones share one list.
#[derive(Clone, Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: Arc<Mutex<Vec<String>>>,
}

impl MemoryQuoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `quotes`.
    pub fn with_quotes<I, S>(quotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { quotes: Arc::new(Mutex::new(quotes.into_iter().map(Into::into).collect())) }
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.quotes.lock().expect("Mutex poisoned").clone())
    }

    fn append(&self, quote: String) -> Result<(), StorageError> {
        self.quotes.lock().expect("Mutex poisoned").push(quote);
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.quotes.lock().expect("Mutex poisoned").len())
    }
}
