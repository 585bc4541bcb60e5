//! SHA-256 hashing module - digests for blocks and proof checks

mod hash;

pub use hash::*;
