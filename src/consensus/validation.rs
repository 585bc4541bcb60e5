//! Chain validation
//!
//! Pure functions that walk a candidate chain and confirm hash linkage and
//! proof validity. Operates on the supplied slice only, so foreign chains
//! can be checked without adopting them.

use crate::consensus::valid_proof;
use crate::crypto::block_digest;
use crate::ledger::Block;

/// Check that every block links to its predecessor's digest and carries a
/// proof valid against the predecessor's proof.
///
/// A chain of length 1 (genesis only) is trivially valid. Returns false at
/// the first broken pair.
pub fn valid_chain(chain: &[Block]) -> bool {
    for pair in chain.windows(2) {
        let (previous, block) = (&pair[0], &pair[1]);

        if block.previous_hash != block_digest(previous) {
            return false;
        }

        if !valid_proof(block.proof, previous.proof) {
            return false;
        }
    }

    true
}
