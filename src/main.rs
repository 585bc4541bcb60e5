//! Pebble Ledger Node
//!
//! Main entry point for running a Pebble node: one in-memory ledger, an
//! HTTP API, and longest-valid-chain reconciliation with registered peers.

use std::sync::Arc;

use clap::Parser;
use pebble_core::rpc::{self, NodeState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pebble-node", about = "Minimal PoW ledger node")]
struct Args {
    /// Port for the HTTP API
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Peer address to register at startup (repeatable)
    #[arg(long = "peer")]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(NodeState::new());

    {
        let mut peers = state.peers.write().await;
        for address in &args.peers {
            match peers.register(address) {
                Ok(location) => info!(peer = %location, "bootstrap peer registered"),
                Err(e) => warn!(address = %address, error = %e, "skipping bootstrap peer"),
            }
        }
    }

    info!(node_id = %state.node_id, port = args.port, "pebble node starting");

    tokio::select! {
        result = rpc::serve(state.clone(), args.port) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping node");
            state.stop_searches();
        }
    }

    Ok(())
}
