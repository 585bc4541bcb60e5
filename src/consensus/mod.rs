//! Consensus module - proof-of-work puzzle and chain validation

mod pow;
mod validation;

pub use pow::*;
pub use validation::*;
