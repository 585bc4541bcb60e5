//! Ledger state management
//!
//! The `Ledger` exclusively owns the chain and the pending pool and is the
//! sole mutator of both. Consensus resolution may swap the whole chain via
//! `replace_chain` but never edits blocks in place.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::crypto::block_digest;
use crate::ledger::{Block, Transaction};

/// Append-only chain plus the pool of not-yet-sealed transactions.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.seal_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    /// The full chain, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> u64 {
        self.chain.len() as u64
    }

    /// Transactions queued for the next block, in submission order.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// The last block in the chain.
    ///
    /// Panics if the chain is empty, which cannot happen after construction;
    /// an empty chain here is a broken invariant, not a recoverable state.
    pub fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger constructed without a genesis block")
    }

    /// Queue a transaction for inclusion in the next sealed block.
    ///
    /// Returns the index the transaction will occupy once that block exists.
    /// Amounts and identifiers are taken as given; this ledger tracks no
    /// balances.
    pub fn queue_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending
            .push(Transaction::new(sender, recipient, amount));
        self.tip().index + 1
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// The pool snapshot-and-clear and the append happen in one `&mut self`
    /// call, so no observer can see a half-sealed state. `previous_hash`
    /// exists only to special-case genesis; normal callers pass `None` and
    /// get the digest of the current tip.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<String>) -> Block {
        let previous_hash =
            previous_hash.unwrap_or_else(|| block_digest(self.tip()));

        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: now_millis(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };

        self.chain.push(block.clone());
        block
    }

    /// Wholesale-swap the chain for an already validated candidate.
    ///
    /// Callers must have run chain validation first. The pending pool is
    /// left untouched.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}
