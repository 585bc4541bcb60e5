//! HTTP endpoint handlers
//!
//! Request bodies are read as raw JSON values and validated by hand so that
//! every malformed request maps to a 400 with a readable message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::consensus::{valid_proof, Miner, MiningResult};
use crate::constants::{MINING_REWARD, SYSTEM_SENDER};
use crate::ledger::{Block, Ledger};
use crate::p2p::{self, ChainSnapshot, PeerRegistry};

/// Shared node state handed to every handler.
pub struct NodeState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub peers: Arc<RwLock<PeerRegistry>>,
    pub client: reqwest::Client,
    /// Globally unique identifier of this node, credited by mining rewards
    pub node_id: String,
    /// Stop signals of in-flight proof searches, one per search
    searches: Mutex<Vec<Arc<AtomicBool>>>,
}

impl NodeState {
    /// Construct fresh node state: genesis ledger, empty peer set, new id.
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(RwLock::new(Ledger::new())),
            peers: Arc::new(RwLock::new(PeerRegistry::new())),
            client: p2p::http_client(),
            node_id: uuid::Uuid::new_v4().simple().to_string(),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Start a proof search with its own stop signal, tracked for
    /// cancellation. Concurrent searches never share a signal, so stopping
    /// one batch cannot be undone by a later search starting.
    pub fn begin_search(&self) -> Miner {
        let miner = Miner::new();
        self.searches.lock().unwrap().push(miner.stop_signal());
        miner
    }

    /// Drop a finished search's signal from the tracked set.
    pub fn end_search(&self, miner: &Miner) {
        let signal = miner.stop_signal();
        self.searches
            .lock()
            .unwrap()
            .retain(|s| !Arc::ptr_eq(s, &signal));
    }

    /// Stop every in-flight proof search.
    pub fn stop_searches(&self) {
        for signal in self.searches.lock().unwrap().drain(..) {
            signal.store(true, Ordering::SeqCst);
        }
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Credit the mining reward and seal a solved proof, unless the tip changed
/// while the search ran.
///
/// The proof was solved against a snapshot of the tip taken before the
/// search; if consensus resolution swapped the chain in the meantime, the
/// proof no longer satisfies the difficulty predicate against the new tip
/// and sealing it would break the chain invariant. Returns `None` in that
/// case, leaving the ledger untouched.
fn seal_solved_block(ledger: &mut Ledger, proof: u64, node_id: &str) -> Option<Block> {
    if !valid_proof(proof, ledger.tip().proof) {
        return None;
    }

    ledger.queue_transaction(SYSTEM_SENDER, node_id.to_string(), MINING_REWARD);
    Some(ledger.seal_block(proof, None))
}

/// `GET /mine` - solve the proof puzzle, credit the reward, seal a block.
pub async fn mine(State(state): State<Arc<NodeState>>) -> (StatusCode, Json<Value>) {
    // Immutable snapshot of the tip proof; no lock is held while solving
    let previous = state.ledger.read().await.tip().proof;

    let miner = state.begin_search();
    let solver = miner.clone();
    let result = tokio::task::spawn_blocking(move || solver.solve(previous)).await;
    state.end_search(&miner);

    match result {
        Ok(MiningResult::Solved(proof)) => {
            let mut ledger = state.ledger.write().await;
            let Some(block) = seal_solved_block(&mut ledger, proof, &state.node_id) else {
                warn!(proof, "tip changed during proof search, discarding stale proof");
                return (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": "mining interrupted, chain was replaced" })),
                );
            };
            info!(index = block.index, proof, "sealed new block");

            (
                StatusCode::OK,
                Json(json!({
                    "message": "new block sealed",
                    "index": block.index,
                    "transactions": block.transactions,
                    "proof": block.proof,
                    "previous_hash": block.previous_hash,
                })),
            )
        }
        Ok(MiningResult::Interrupted) => {
            warn!("proof search interrupted by chain replacement");
            (
                StatusCode::CONFLICT,
                Json(json!({ "message": "mining interrupted, chain was replaced" })),
            )
        }
        Err(e) => {
            warn!(error = %e, "mining task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "mining task failed" })),
            )
        }
    }
}

/// `POST /transactions/new` - queue a transaction for the next block.
pub async fn new_transaction(
    State(state): State<Arc<NodeState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let sender = body.get("sender").and_then(Value::as_str);
    let recipient = body.get("recipient").and_then(Value::as_str);
    let amount = body.get("amount").and_then(Value::as_u64);

    let (Some(sender), Some(recipient), Some(amount)) = (sender, recipient, amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "missing required fields: sender, recipient, amount" })),
        );
    };

    let index = state
        .ledger
        .write()
        .await
        .queue_transaction(sender, recipient, amount);
    info!(sender, recipient, amount, block = index, "transaction queued");

    (
        StatusCode::CREATED,
        Json(json!({ "message": format!("transaction will be added to block {index}") })),
    )
}

/// `GET /chain` - the full chain and its length.
pub async fn chain(State(state): State<Arc<NodeState>>) -> Json<ChainSnapshot> {
    let ledger = state.ledger.read().await;
    Json(ChainSnapshot {
        chain: ledger.chain().to_vec(),
        length: ledger.len(),
    })
}

/// `GET /nodes/resolve` - run one longest-valid-chain resolution pass.
pub async fn resolve(State(state): State<Arc<NodeState>>) -> (StatusCode, Json<Value>) {
    let replaced = p2p::resolve_conflicts(&state.client, &state.ledger, &state.peers).await;
    let chain = state.ledger.read().await.chain().to_vec();

    if replaced {
        // Abandon in-flight proof searches; they are solving stale puzzles
        state.stop_searches();
        (
            StatusCode::OK,
            Json(json!({ "message": "chain replaced", "new_chain": chain })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({ "message": "chain authoritative", "chain": chain })),
        )
    }
}

/// `POST /nodes/register` - add peer addresses to the registry.
pub async fn register_nodes(
    State(state): State<Arc<NodeState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(nodes) = body.get("nodes").and_then(Value::as_array) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "please supply a list of node addresses" })),
        );
    };

    if nodes.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "please supply a list of node addresses" })),
        );
    }

    let mut addresses = Vec::with_capacity(nodes.len());
    for node in nodes {
        let Some(address) = node.as_str() else {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "node addresses must be strings" })),
            );
        };
        addresses.push(address);
    }

    let mut peers = state.peers.write().await;
    match peers.register_all(&addresses) {
        Ok(locations) => {
            for location in &locations {
                info!(peer = %location, "peer registered");
            }
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "new peers registered",
                    "total_nodes": peers.addresses(),
                })),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": e.to_string() })),
        ),
    }
}
