//! Block and transaction structures
//!
//! Defines the immutable records the ledger appends. Field order matters:
//! the canonical block digest hashes the serde_json encoding, which follows
//! declaration order.

use serde::{Deserialize, Serialize};

/// A value transfer between two identifiers.
///
/// No signature and no uniqueness constraint; immutable once sealed into a
/// block, appendable while pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender identifier ("0" marks a system-minted reward)
    pub sender: String,
    /// Recipient identifier
    pub recipient: String,
    /// Transferred amount
    pub amount: u64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Whether this is a system-minted mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == crate::constants::SYSTEM_SENDER
    }
}

/// A sealed batch of transactions linked to its predecessor by digest.
///
/// Immutable after append; any field change breaks the digest of every
/// later block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, 1-based (genesis is index 1)
    pub index: u64,
    /// Wall-clock seal time, unix milliseconds
    pub timestamp: u64,
    /// Transactions sealed into this block, in submission order
    pub transactions: Vec<Transaction>,
    /// Proof satisfying the difficulty predicate against the predecessor's proof
    pub proof: u64,
    /// Digest of the previous block, or the genesis sentinel
    pub previous_hash: String,
}

impl Block {
    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == crate::constants::GENESIS_PREVIOUS_HASH
    }
}
