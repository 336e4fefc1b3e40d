//! Per-user puzzle sessions.
//!
//! The registry maps an opaque user identifier to that user's single active
//! puzzle. Starting a puzzle replaces any previous one for the same user; the
//! old one is abandoned. Absence from the map means "no active puzzle".
//!
//! # Concurrency
//!
//! The map sits behind an `RwLock` and every puzzle behind its own `Mutex`.
//! The map lock is held only long enough to look up, insert or remove an
//! entry, so work on one user's puzzle never blocks another user. Calls for the
//! same user serialize on that puzzle's mutex. Clones share the same sessions.

#![allow(clippy::expect_used, reason = "Lock poisoning should cause a panic")]

use std::{
    collections::HashMap,
    fmt,
    hash::Hash,
    sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{env::Environment, puzzle::Puzzle};

/// Opaque user identifier.
///
/// The registry only needs equality and hashing; the string form is whatever
/// the chat layer uses to tell users apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Identifier from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type SharedPuzzle = Arc<Mutex<Puzzle>>;

/// Registry of active puzzles, at most one per user.
///
/// Thread-safe via `Arc<RwLock<_>>`. Clone shares the same underlying sessions.
pub struct PuzzleRegistry<U = UserId> {
    sessions: Arc<RwLock<HashMap<U, SharedPuzzle>>>,
}

impl<U> Clone for PuzzleRegistry<U> {
    fn clone(&self) -> Self {
        Self { sessions: Arc::clone(&self.sessions) }
    }
}

impl<U> Default for PuzzleRegistry<U> {
    fn default() -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl<U> fmt::Debug for PuzzleRegistry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleRegistry").field("sessions", &self.read().len()).finish()
    }
}

impl<U> PuzzleRegistry<U> {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<U, SharedPuzzle>> {
        self.sessions.read().expect("PuzzleRegistry lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<U, SharedPuzzle>> {
        self.sessions.write().expect("PuzzleRegistry lock poisoned")
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// `true` if no user has an active puzzle.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<U> PuzzleRegistry<U>
where
    U: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new puzzle for `user`, abandoning any current one.
    ///
    /// Returns a copy of the new puzzle for display.
    pub fn start<E: Environment>(&self, user: U, plaintext: &str, env: &E) -> Puzzle {
        let puzzle = Puzzle::new(plaintext, env);
        self.insert(user, puzzle.clone());
        puzzle
    }

    /// Install `puzzle` as the active puzzle for `user`.
    ///
    /// Returns the puzzle it replaced, if any.
    pub fn insert(&self, user: U, puzzle: Puzzle) -> Option<Puzzle> {
        let previous = self.write().insert(user.clone(), Arc::new(Mutex::new(puzzle)));

        match previous {
            Some(previous) => {
                tracing::debug!(?user, "puzzle session replaced, previous abandoned");
                Some(into_puzzle(previous))
            },
            None => {
                tracing::debug!(?user, "puzzle session started");
                None
            },
        }
    }

    /// Run `f` against the user's puzzle. `None` if the user has no session.
    pub fn with_puzzle<R>(&self, user: &U, f: impl FnOnce(&Puzzle) -> R) -> Option<R> {
        let shared = self.shared(user)?;
        let puzzle = shared.lock().expect("puzzle mutex poisoned");
        Some(f(&puzzle))
    }

    /// Run `f` against the user's puzzle with mutable access. `None` if the
    /// user has no session.
    pub fn with_puzzle_mut<R>(&self, user: &U, f: impl FnOnce(&mut Puzzle) -> R) -> Option<R> {
        let shared = self.shared(user)?;
        let mut puzzle = shared.lock().expect("puzzle mutex poisoned");
        Some(f(&mut puzzle))
    }

    /// Copy of the user's current puzzle.
    pub fn snapshot(&self, user: &U) -> Option<Puzzle> {
        self.with_puzzle(user, Puzzle::clone)
    }

    /// `true` if the user has an active puzzle.
    pub fn contains(&self, user: &U) -> bool {
        self.read().contains_key(user)
    }

    /// End the user's session, returning the puzzle it held.
    pub fn end(&self, user: &U) -> Option<Puzzle> {
        let removed = self.write().remove(user)?;
        tracing::debug!(?user, "puzzle session ended");
        Some(into_puzzle(removed))
    }

    /// End the user's session only if `finished` holds for its puzzle.
    ///
    /// `finished` runs under the puzzle's own mutex, and the map lock is taken
    /// only afterwards for the removal, so a pending end never stalls other
    /// users. The entry is removed only if it still holds the checked puzzle;
    /// a puzzle that replaced it in between stays registered. `finished` must
    /// not call back into the registry.
    pub fn end_if(&self, user: &U, finished: impl FnOnce(&Puzzle) -> bool) -> Option<Puzzle> {
        let shared = self.shared(user)?;
        let puzzle = shared.lock().expect("puzzle mutex poisoned");
        if !finished(&puzzle) {
            return None;
        }

        let removed = {
            let mut sessions = self.write();
            if !sessions.get(user).is_some_and(|current| Arc::ptr_eq(current, &shared)) {
                tracing::debug!(?user, "puzzle session replaced before it could end");
                return None;
            }
            sessions.remove(user)?
        };
        drop(puzzle);
        drop(shared);

        tracing::debug!(?user, "puzzle session finished");
        Some(into_puzzle(removed))
    }

    /// Clone the handle out so the map lock is released before the puzzle is
    /// locked.
    fn shared(&self, user: &U) -> Option<SharedPuzzle> {
        self.read().get(user).cloned()
    }
}

/// Take the puzzle out of its handle, copying it if another caller still holds
/// the handle.
fn into_puzzle(shared: SharedPuzzle) -> Puzzle {
    match Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner().expect("puzzle mutex poisoned"),
        Err(shared) => shared.lock().expect("puzzle mutex poisoned").clone(),
    }
}
