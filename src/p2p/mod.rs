//! Peer-to-peer module - peer registry and chain reconciliation

mod registry;
mod sync;

pub use registry::*;
pub use sync::*;
