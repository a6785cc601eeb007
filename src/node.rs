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

//! Node: owner of the local chain and the peer registry.
//!
//! Every chain mutation goes through [`Node::mine`] or [`Node::handle_blocks`], both
//! of which hold the single chain mutex for the whole read-validate-commit step.
//! The mutex is never held across an `.await` or while sending to peers.

use crate::core::block::Block;
use crate::core::chain::Chain;
use crate::core::reconcile::{reconcile, Outcome};
use crate::core::validator::LinkError;
use crate::monitoring::metrics::Metrics;
use crate::networking::message::Message;
use crate::networking::peers::{PeerId, PeerRegistry, PeerRx};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Coordinating component shared by the gossip transport and the HTTP gateway.
pub struct Node {
    chain: Mutex<Chain>,
    peers: PeerRegistry,
    metrics: Arc<Metrics>,
}

impl Node {
    /// Fresh node holding only the genesis block.
    pub fn new(metrics: Arc<Metrics>) -> Self {
        metrics.chain_height.set(0);
        Self {
            chain: Mutex::new(Chain::new()),
            peers: PeerRegistry::new(),
            metrics,
        }
    }

    fn chain(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the whole chain, genesis first.
    pub fn blocks(&self) -> Vec<Block> {
        self.chain().blocks().to_vec()
    }

    /// Copy of the current tip.
    pub fn latest(&self) -> Block {
        self.chain().latest().clone()
    }

    /// Number of blocks in the local chain.
    pub fn chain_len(&self) -> usize {
        self.chain().len()
    }

    /// Peer registry.
    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    /// Metrics handle.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Mine a block on top of the tip, append it, and announce it to all peers.
    pub fn mine(&self, data: Value, author: Option<String>) -> Result<Block, LinkError> {
        let block = {
            let mut chain = self.chain();
            let block = chain.mine_block(data, author);
            chain.append_if_valid(block.clone())?;
            self.metrics.chain_height.set(block.index as i64);
            block
        };
        self.metrics.blocks_appended_total.inc();
        info!(index = block.index, hash = %block.hash, "block mined");
        let sent = self.peers.broadcast(&Message::tip(block.clone()));
        debug!(peers = sent, "tip broadcast");
        Ok(block)
    }

    /// Reconcile blocks reported by `from` and perform the resulting side effect.
    pub fn handle_blocks(&self, from: PeerId, blocks: Vec<Block>) -> Outcome {
        let outcome = {
            let mut chain = self.chain();
            let outcome = reconcile(&mut chain, blocks);
            self.metrics.chain_height.set(chain.latest().index as i64);
            outcome
        };

        if let Some(tip) = outcome.new_tip() {
            self.peers.broadcast(&Message::tip(tip.clone()));
        }
        match &outcome {
            Outcome::Appended(_) => self.metrics.blocks_appended_total.inc(),
            Outcome::Replaced(_) => self.metrics.chain_replaced_total.inc(),
            Outcome::QueryAll => {
                if !self.peers.send(from, Message::QueryAll) {
                    debug!(peer = %from, "peer gone before full-chain query");
                }
            }
            Outcome::Rejected(reason) => {
                self.metrics.rejected_chains_total.inc();
                warn!(peer = %from, ?reason, "peer chain rejected");
            }
            Outcome::Empty | Outcome::NotLonger { .. } => {}
        }
        outcome
    }

    /// Dispatch one decoded gossip message from `from`.
    pub fn handle_message(&self, from: PeerId, msg: Message) {
        debug!(peer = %from, kind = msg.kind(), "gossip message");
        match msg {
            Message::QueryLatest => {
                self.peers.send(from, Message::tip(self.latest()));
            }
            Message::QueryAll => {
                self.peers
                    .send(from, Message::ResponseBlockchain(self.blocks()));
            }
            Message::ResponseBlockchain(blocks) => {
                self.handle_blocks(from, blocks);
            }
        }
    }

    /// Decode and dispatch one raw text frame. Malformed frames are dropped.
    pub fn handle_frame(&self, from: PeerId, raw: &str) {
        match Message::decode(raw) {
            Ok(msg) => self.handle_message(from, msg),
            Err(e) => {
                self.metrics.invalid_msg_total.inc();
                warn!(peer = %from, error = %e, "dropping malformed gossip frame");
            }
        }
    }

    /// Register a new connection and queue the initial `QUERY_LATEST`.
    pub fn register_peer(&self, addr: SocketAddr) -> (PeerId, PeerRx) {
        let (id, rx) = self.peers.register(addr);
        self.metrics.peers.set(self.peers.len() as i64);
        self.peers.send(id, Message::QueryLatest);
        info!(peer = %id, %addr, "peer connected");
        (id, rx)
    }

    /// Drop a connection from the registry.
    pub fn remove_peer(&self, id: PeerId) {
        if self.peers.remove(id) {
            self.metrics.peers.set(self.peers.len() as i64);
            info!(peer = %id, "peer disconnected");
        }
    }
}
