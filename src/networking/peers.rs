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
#![deny(missing_docs)]

//! Registry of live peer connections.
//!
//! Each entry is the outbound half of a connection: an unbounded queue drained by
//! that connection's writer task. Sends are fire-and-forget. A successful
//! [`PeerRegistry::send`] or [`PeerRegistry::broadcast`] only means the message was
//! queued; there is no acknowledgement, retry, or ordering across peers, and a slow
//! peer is never throttled. Entries are not deduplicated by address.

use crate::networking::message::Message;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Process-local connection id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Receiving end of a peer's outbound queue.
pub type PeerRx = mpsc::UnboundedReceiver<Message>;

struct PeerEntry {
    addr: SocketAddr,
    tx: mpsc::UnboundedSender<Message>,
}

/// Set of registered peers.
#[derive(Default)]
pub struct PeerRegistry {
    next_id: AtomicU64,
    peers: Mutex<BTreeMap<PeerId, PeerEntry>>,
}

impl PeerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<PeerId, PeerEntry>> {
        self.peers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a connection to `addr`; returns its id and the queue to drain.
    pub fn register(&self, addr: SocketAddr) -> (PeerId, PeerRx) {
        let id = PeerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.entries().insert(id, PeerEntry { addr, tx });
        (id, rx)
    }

    /// Remove a peer. Returns false if it was already gone.
    pub fn remove(&self, id: PeerId) -> bool {
        self.entries().remove(&id).is_some()
    }

    /// Number of registered peers.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True if no peer is registered.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Remote endpoints as `host:port`, in registration order.
    pub fn endpoints(&self) -> Vec<String> {
        self.entries().values().map(|p| p.addr.to_string()).collect()
    }

    /// Queue `msg` for one peer. False if the peer is unknown or its writer is gone.
    pub fn send(&self, id: PeerId, msg: Message) -> bool {
        match self.entries().get(&id) {
            Some(p) => p.tx.send(msg).is_ok(),
            None => false,
        }
    }

    /// Queue `msg` for every registered peer; returns how many queues accepted it.
    pub fn broadcast(&self, msg: &Message) -> usize {
        self.entries()
            .values()
            .filter(|p| p.tx.send(msg.clone()).is_ok())
            .count()
    }
}
