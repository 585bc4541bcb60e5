//! Pebble Ledger Core Library
//!
//! A minimal append-only ledger with proof-of-work sealing and
//! longest-valid-chain reconciliation between peer nodes.
//!
//! The ledger lives entirely in process memory: pending transactions batch
//! into blocks, each block is sealed by a brute-force proof, and nodes
//! converge by adopting the longest structurally valid chain they can see.

pub mod consensus;
pub mod crypto;
pub mod ledger;
pub mod p2p;
pub mod rpc;

/// Protocol constants
pub mod constants {
    /// Leading zero hex digits a valid proof digest must carry.
    ///
    /// Expected work per sealed block is roughly 16^DIFFICULTY hash
    /// evaluations. There is no difficulty adjustment.
    pub const DIFFICULTY: usize = 4;

    /// Proof recorded in the genesis block (no predecessor to satisfy).
    pub const GENESIS_PROOF: u64 = 100;

    /// Sentinel previous-hash of the genesis block.
    pub const GENESIS_PREVIOUS_HASH: &str = "1";

    /// Sentinel sender identifier for system-minted reward transactions.
    pub const SYSTEM_SENDER: &str = "0";

    /// Amount credited to a node for sealing a block.
    pub const MINING_REWARD: u64 = 1;
}
