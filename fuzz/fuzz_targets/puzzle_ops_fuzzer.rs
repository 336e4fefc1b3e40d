//! Fuzz target for puzzle state transitions
//!
//! Applies arbitrary guess/undo/clear/hint sequences to a real `Puzzle` and
//! to the reference `ModelPuzzle`, comparing every observable after each step.
//!
//! # Invariants
//!
//! - Revealed letters always agree with the true mapping
//! - `is_solved` holds exactly when the guess string equals the plaintext
//! - Real puzzle and model never diverge

#![no_main]

use arbitrary::Arbitrary;
use codebusters_core::{CipherMapping, Puzzle};
use codebusters_harness::{ModelPuzzle, Operation, SimEnv};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Scenario {
    seed: u64,
    plaintext: String,
    operations: Vec<Operation>,
}

fuzz_target!(|scenario: Scenario| {
    let env = SimEnv::with_seed(scenario.seed);
    let mapping = CipherMapping::generate(&env);
    let mut puzzle = Puzzle::with_mapping(&scenario.plaintext, mapping.clone());
    let mut model = ModelPuzzle::new(&scenario.plaintext, &mapping);

    for operation in scenario.operations {
        if let Err(divergence) = operation.apply(&mut puzzle, &mut model, &env) {
            panic!("{divergence:?}");
        }

        for (cipher, plain) in puzzle.revealed() {
            assert_eq!(mapping.plain_for(cipher), plain, "revealed {cipher}={plain} is wrong");
        }
        assert_eq!(puzzle.is_solved(), puzzle.current_guess() == puzzle.plaintext());
    }
});
