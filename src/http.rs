// Copyright (c) 2026 Memechain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! HTTP gateway: list blocks, mine, list and add peers, metrics.

use crate::core::block::Block;
use crate::networking::gossip;
use crate::node::Node;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Body of `POST /mineBlock`.
#[derive(Debug, Deserialize)]
pub struct MineRequest {
    /// Block payload.
    pub data: Value,
    /// Optional author.
    #[serde(default)]
    pub author: Option<String>,
}

/// Body of `POST /addPeer`.
#[derive(Debug, Deserialize)]
pub struct AddPeerRequest {
    /// Peer URL, `ws://host:port`.
    pub peer: String,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

/// Build the router over a shared node.
pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route("/blocks", get(list_blocks))
        .route("/mineBlock", post(mine_block))
        .route("/peers", get(list_peers))
        .route("/addPeer", post(add_peer))
        .route("/metrics", get(metrics))
        .with_state(node)
}

/// Bind `addr` and serve the gateway until the listener fails.
pub async fn serve(node: Arc<Node>, addr: String) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "http gateway listening");
    axum::serve(listener, router(node)).await
}

/// GET /blocks
pub async fn list_blocks(State(node): State<Arc<Node>>) -> Json<Vec<Block>> {
    Json(node.blocks())
}

/// POST /mineBlock
///
/// 201 with the new block once it is committed and broadcast; 409 if it failed
/// validation against the tip, in which case nothing was broadcast.
pub async fn mine_block(
    State(node): State<Arc<Node>>,
    Json(req): Json<MineRequest>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    match node.mine(req.data, req.author) {
        Ok(block) => Ok((StatusCode::CREATED, Json(block))),
        Err(e) => {
            warn!(error = %e, "mined block rejected");
            Err((
                StatusCode::CONFLICT,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// GET /peers
pub async fn list_peers(State(node): State<Arc<Node>>) -> Json<Vec<String>> {
    Json(node.peers().endpoints())
}

/// POST /addPeer
///
/// Returns 202 immediately; the outcome of the connection attempt is only logged.
pub async fn add_peer(
    State(node): State<Arc<Node>>,
    Json(req): Json<AddPeerRequest>,
) -> StatusCode {
    gossip::dial(node, req.peer);
    StatusCode::ACCEPTED
}

/// GET /metrics
pub async fn metrics(State(node): State<Arc<Node>>) -> Result<String, StatusCode> {
    node.metrics()
        .render()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
