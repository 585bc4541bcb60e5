//! HTTP server
//!
//! Axum-based server exposing the node's ledger operations.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::rpc::handlers::{self, NodeState};

/// Build the node's HTTP router.
pub fn build_router(state: Arc<NodeState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/mine", get(handlers::mine))
        .route("/transactions/new", post(handlers::new_transaction))
        .route("/chain", get(handlers::chain))
        .route("/nodes/register", post(handlers::register_nodes))
        .route("/nodes/resolve", get(handlers::resolve))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the HTTP API on the given port.
pub async fn serve(state: Arc<NodeState>, port: u16) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await
}
