//! HTTP API module
//!
//! Thin axum adapter over the ledger core: mining, transaction submission,
//! chain reads, peer registration, and consensus resolution.

mod handlers;
mod server;

pub use handlers::*;
pub use server::*;
