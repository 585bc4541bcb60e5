//! Proof-of-work puzzle
//!
//! A proof is valid when SHA-256 of the candidate proof concatenated with
//! the previous block's proof starts with a run of zero hex digits. Solving
//! is a brute-force scan from zero; it is the system's only artificial
//! scarcity mechanism.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constants::DIFFICULTY;
use crate::crypto::sha256_hex;

/// Outcome of a proof search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningResult {
    /// Found a proof satisfying the difficulty predicate
    Solved(u64),
    /// Search was stopped before a proof was found
    Interrupted,
}

/// Check a candidate proof against the previous block's proof.
///
/// Pure and deterministic; also used when validating foreign chains.
pub fn valid_proof(candidate: u64, previous: u64) -> bool {
    let guess = format!("{candidate}{previous}");
    let digest = sha256_hex(guess.as_bytes());
    digest.as_bytes()[..DIFFICULTY].iter().all(|&b| b == b'0')
}

/// Brute-force proof searcher with a shared stop signal.
///
/// The search is CPU-bound and unbounded; callers run it off the async
/// runtime (spawn_blocking) with only an immutable snapshot of the previous
/// proof, never holding a ledger lock.
#[derive(Clone)]
pub struct Miner {
    stop_signal: Arc<AtomicBool>,
}

impl Miner {
    /// Create a new miner
    pub fn new() -> Self {
        Self {
            stop_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a stop signal handle
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }

    /// Stop an in-flight search
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Clear the stop signal before a new search
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }

    /// Search non-negative integers in increasing order for a valid proof.
    ///
    /// Termination is probabilistic (expected ~16^DIFFICULTY evaluations)
    /// unless the stop signal fires first.
    pub fn solve(&self, previous: u64) -> MiningResult {
        let mut candidate: u64 = 0;
        loop {
            if self.stop_signal.load(Ordering::SeqCst) {
                return MiningResult::Interrupted;
            }

            if valid_proof(candidate, previous) {
                return MiningResult::Solved(candidate);
            }

            candidate += 1;
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}
