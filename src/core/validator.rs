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

//! Pure integrity checks for blocks and chains.
//!
//! `check_*` functions report the violated condition; `is_*` wrappers log it and
//! collapse the result to a bool so callers never have to abort on a bad block.

use crate::core::block::{hash_for_block, Block};
use thiserror::Error;
use tracing::warn;

/// Why a block does not extend its parent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// `candidate.index != parent.index + 1`.
    #[error("invalid index: expected {expected}, got {got}")]
    Index {
        /// Index the candidate should carry.
        expected: u64,
        /// Index it actually carries.
        got: u64,
    },
    /// `candidate.previous_hash != parent.hash`.
    #[error("invalid previous hash at index {index}")]
    PreviousHash {
        /// Candidate index.
        index: u64,
    },
    /// Stored hash does not match the recomputed digest.
    #[error("invalid hash at index {index}")]
    Hash {
        /// Candidate index.
        index: u64,
    },
}

/// Why a whole chain is invalid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// No blocks at all.
    #[error("empty chain")]
    Empty,
    /// First block is not the canonical genesis block.
    #[error("chain does not start at genesis")]
    BadGenesis,
    /// A consecutive pair does not link.
    #[error("broken link at position {position}: {source}")]
    Link {
        /// Position of the offending block in the chain.
        position: usize,
        /// Violated condition.
        source: LinkError,
    },
}

/// Check that `candidate` directly extends `parent`.
pub fn check_link(candidate: &Block, parent: &Block) -> Result<(), LinkError> {
    let expected = parent.index.checked_add(1).ok_or(LinkError::Index {
        expected: u64::MAX,
        got: candidate.index,
    })?;
    if candidate.index != expected {
        return Err(LinkError::Index {
            expected,
            got: candidate.index,
        });
    }
    if candidate.previous_hash != parent.hash {
        return Err(LinkError::PreviousHash {
            index: candidate.index,
        });
    }
    if hash_for_block(candidate) != candidate.hash {
        return Err(LinkError::Hash {
            index: candidate.index,
        });
    }
    Ok(())
}

/// Boolean form of [`check_link`]; the violated condition is logged.
pub fn is_link_valid(candidate: &Block, parent: &Block) -> bool {
    match check_link(candidate, parent) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "block rejected");
            false
        }
    }
}

/// Check the explicitly given chain: genesis-rooted and linked pairwise.
pub fn check_chain(chain: &[Block]) -> Result<(), ChainError> {
    let first = chain.first().ok_or(ChainError::Empty)?;
    if !first.is_genesis() {
        return Err(ChainError::BadGenesis);
    }
    for (position, pair) in chain.windows(2).enumerate() {
        check_link(&pair[1], &pair[0]).map_err(|source| ChainError::Link {
            position: position + 1,
            source,
        })?;
    }
    Ok(())
}

/// Boolean form of [`check_chain`]; the violated condition is logged.
pub fn is_chain_valid(chain: &[Block]) -> bool {
    match check_chain(chain) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, len = chain.len(), "chain rejected");
            false
        }
    }
}
