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

//! Fork resolution: longest valid chain wins.
//!
//! [`reconcile`] is pure with respect to the network. It mutates the chain it is
//! handed and returns an [`Outcome`] telling the caller which message, if any, must go
//! out afterwards. Equal-length candidates are never adopted, invalid ones never are.

use crate::core::block::Block;
use crate::core::chain::{Chain, ReplaceError};
use crate::core::validator::{ChainError, LinkError};
use tracing::{debug, info, warn};

/// Why a peer-reported block or chain was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Tip announced as our direct successor did not validate.
    Link(LinkError),
    /// Full candidate chain did not validate.
    Chain(ChainError),
}

/// Result of one reconciliation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The peer sent no blocks.
    Empty,
    /// Local chain is at least as long; nothing changed.
    NotLonger {
        /// Local tip index (or length, for a not-longer full candidate).
        local: u64,
        /// Remote tip index (or length).
        remote: u64,
    },
    /// Remote tip was appended; broadcast it.
    Appended(Block),
    /// Local chain was replaced wholesale; broadcast the new tip.
    Replaced(Block),
    /// Peer is ahead on an unknown branch; ask that peer for its full chain.
    QueryAll,
    /// Candidate refused; chain untouched.
    Rejected(Rejection),
}

impl Outcome {
    /// Tip that must be announced to every peer, if the chain changed.
    pub fn new_tip(&self) -> Option<&Block> {
        match self {
            Outcome::Appended(b) | Outcome::Replaced(b) => Some(b),
            _ => None,
        }
    }
}

/// Reconcile `chain` against the blocks a peer reported.
pub fn reconcile(chain: &mut Chain, mut received: Vec<Block>) -> Outcome {
    received.sort_by_key(|b| b.index);
    let Some(remote_tip) = received.last() else {
        return Outcome::Empty;
    };
    let local_tip = chain.latest();

    if remote_tip.index <= local_tip.index {
        debug!(
            local = local_tip.index,
            remote = remote_tip.index,
            "received chain is not longer; ignoring"
        );
        return Outcome::NotLonger {
            local: local_tip.index,
            remote: remote_tip.index,
        };
    }

    info!(
        local = local_tip.index,
        remote = remote_tip.index,
        "local chain is possibly behind"
    );

    if local_tip.hash == remote_tip.previous_hash {
        let tip = remote_tip.clone();
        return match chain.append_if_valid(tip.clone()) {
            Ok(()) => {
                info!(index = tip.index, "appended peer tip");
                Outcome::Appended(tip)
            }
            Err(e) => {
                warn!(error = %e, "peer tip rejected");
                Outcome::Rejected(Rejection::Link(e))
            }
        };
    }

    if received.len() == 1 {
        info!("peer tip does not link onto ours; querying full chain");
        return Outcome::QueryAll;
    }

    match chain.replace_with(received) {
        Ok(()) => {
            let tip = chain.latest().clone();
            info!(len = chain.len(), "replaced local chain with longer valid chain");
            Outcome::Replaced(tip)
        }
        Err(ReplaceError::NotLonger { local, remote }) => {
            info!(local, remote, "candidate chain not longer; discarded");
            Outcome::NotLonger {
                local: local as u64,
                remote: remote as u64,
            }
        }
        Err(ReplaceError::Invalid(e)) => {
            warn!(error = %e, "candidate chain invalid; discarded");
            Outcome::Rejected(Rejection::Chain(e))
        }
    }
}
