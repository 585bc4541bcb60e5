//! Chain reconciliation
//!
//! Fetches the full chain from every registered peer and adopts the first
//! strictly longer, structurally valid one (longest-valid-chain rule).
//! Peer failures are soft: an unreachable peer is skipped, never fatal to
//! the resolution pass.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::consensus::valid_chain;
use crate::ledger::{Block, Ledger};
use crate::p2p::PeerRegistry;

/// Bound on each peer `/chain` request; a hung peer must not stall the pass.
const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Wire shape of a peer's `/chain` response (same as our own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: u64,
}

/// Peer fetch errors, recovered per peer
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("peer unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("peer returned status {0}")]
    BadStatus(u16),
}

/// Build the HTTP client used for peer fetches.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(PEER_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Fetch a peer's full chain and reported length.
pub async fn fetch_peer_chain(
    client: &reqwest::Client,
    peer: &str,
) -> Result<ChainSnapshot, SyncError> {
    let response = client.get(format!("http://{peer}/chain")).send().await?;

    if !response.status().is_success() {
        return Err(SyncError::BadStatus(response.status().as_u16()));
    }

    Ok(response.json::<ChainSnapshot>().await?)
}

/// Pick the chain to adopt from peer snapshots, if any qualifies.
///
/// A candidate must report a length strictly greater than the running
/// maximum (seeded with the local length) and pass structural validation.
/// Strict `>` means equal-length chains never displace an earlier winner:
/// first-seen-longest wins under the observed iteration order.
pub fn select_candidate(
    local_length: u64,
    snapshots: impl IntoIterator<Item = (String, ChainSnapshot)>,
) -> Option<Vec<Block>> {
    let mut max_length = local_length;
    let mut candidate = None;

    for (peer, snapshot) in snapshots {
        if snapshot.length <= max_length {
            debug!(%peer, length = snapshot.length, max_length, "peer chain not longer");
            continue;
        }

        if !valid_chain(&snapshot.chain) {
            debug!(%peer, length = snapshot.length, "peer chain failed validation");
            continue;
        }

        max_length = snapshot.length;
        candidate = Some(snapshot.chain);
    }

    candidate
}

/// Run one longest-valid-chain resolution pass against the registered peers.
///
/// Peer fetches fan out concurrently (bounded by `PEER_TIMEOUT` each) and
/// are collected in registration order. The candidate decision and the
/// chain swap happen under a single write lock, against one consistent
/// baseline length. Returns true iff the local chain was replaced.
pub async fn resolve_conflicts(
    client: &reqwest::Client,
    ledger: &Arc<RwLock<Ledger>>,
    peers: &Arc<RwLock<PeerRegistry>>,
) -> bool {
    let addresses = peers.read().await.addresses();

    let fetches: Vec<_> = addresses
        .iter()
        .map(|peer| {
            let client = client.clone();
            let peer = peer.clone();
            tokio::spawn(async move {
                let result = fetch_peer_chain(&client, &peer).await;
                (peer, result)
            })
        })
        .collect();

    let mut snapshots = Vec::with_capacity(fetches.len());
    for fetch in fetches {
        match fetch.await {
            Ok((peer, Ok(snapshot))) => snapshots.push((peer, snapshot)),
            Ok((peer, Err(e))) => warn!(%peer, error = %e, "skipping unreachable peer"),
            Err(e) => warn!(error = %e, "peer fetch task failed"),
        }
    }

    let mut ledger = ledger.write().await;
    match select_candidate(ledger.len(), snapshots) {
        Some(chain) => {
            info!(new_length = chain.len(), "replacing local chain");
            ledger.replace_chain(chain);
            true
        }
        None => {
            debug!(length = ledger.len(), "local chain is authoritative");
            false
        }
    }
}
