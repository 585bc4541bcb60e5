//! SHA-256 hashing implementation
//!
//! All hashing in Pebble uses SHA-256, rendered as lowercase hex strings.

use sha2::{Digest, Sha256};

use crate::ledger::Block;

/// Hash arbitrary bytes and return the lowercase hex digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical digest of a block.
///
/// Serializes the block with serde_json, which emits fields in declaration
/// order, so structurally identical blocks always produce the same digest.
/// The digest covers every field including transactions and proof; it both
/// links blocks and detects tampering.
pub fn block_digest(block: &Block) -> String {
    let encoded = serde_json::to_string(block).expect("block serialization cannot fail");
    sha256_hex(encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Block, Transaction};

    fn sample_block() -> Block {
        Block {
            index: 2,
            timestamp: 1_736_339_922_000,
            transactions: vec![Transaction {
                sender: "alice".to_string(),
                recipient: "bob".to_string(),
                amount: 5,
            }],
            proof: 35293,
            previous_hash: "2cf24dba5fb0a30e26e83b2ac5b9e29e".to_string(),
        }
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex(b"hello world"), sha256_hex(b"hello world"));
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_block_digest_stable() {
        let block = sample_block();
        assert_eq!(block_digest(&block), block_digest(&block.clone()));
    }

    #[test]
    fn test_block_digest_is_hex_sha256() {
        let digest = block_digest(&sample_block());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_block_digest_covers_transactions() {
        let block = sample_block();
        let mut tampered = block.clone();
        tampered.transactions[0].amount = 6;
        assert_ne!(block_digest(&block), block_digest(&tampered));
    }

    #[test]
    fn test_block_digest_covers_proof() {
        let block = sample_block();
        let mut tampered = block.clone();
        tampered.proof += 1;
        assert_ne!(block_digest(&block), block_digest(&tampered));
    }
}
