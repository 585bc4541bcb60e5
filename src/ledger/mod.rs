//! Ledger module - typed records, the chain, and the pending pool

mod block;
mod chain;

pub use block::*;
pub use chain::*;
