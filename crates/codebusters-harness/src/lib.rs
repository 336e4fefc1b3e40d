//! Deterministic test harness for Codebusters puzzles.
//!
//! # Simulation
//!
//! [`SimEnv`] implements the core `Environment` with a seeded `ChaCha8`
//! generator, so cipher generation, hints and quote picks replay exactly for a
//! given seed.
//!
//! # Model-Based Testing
//!
//! The `model` module provides [`ModelPuzzle`], a deliberately naive reference
//! implementation of the puzzle rules. Operations are applied to both the model
//! and the real `Puzzle`, and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim_env;

pub use model::{Divergence, ModelPuzzle, Operation};
pub use sim_env::SimEnv;
