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

//! The local chain and the block builder.

use crate::core::block::{digest, genesis_block, now_ms, Block};
use crate::core::validator::{check_chain, check_link, ChainError, LinkError};
use serde_json::Value;

/// Genesis-rooted, always-valid sequence of blocks.
///
/// The only ways to grow it are [`Chain::append_if_valid`] and [`Chain::replace_with`],
/// both of which validate first, so the invariants hold at every point.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Chain holding only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![genesis_block()],
        }
    }

    /// Tip of the chain.
    pub fn latest(&self) -> &Block {
        // Never empty: constructed with genesis, replacements are validated non-empty.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Build (but do not append) the block that would extend the current tip.
    pub fn mine_block(&self, data: Value, author: Option<String>) -> Block {
        let latest = self.latest();
        let index = latest.index + 1;
        let hash = digest(index, &latest.hash, &data, author.as_deref());
        Block {
            index,
            previous_hash: latest.hash.clone(),
            data,
            author,
            hash,
            timestamp: now_ms(),
        }
    }

    /// Append `candidate` if it links onto the tip; otherwise leave the chain untouched.
    pub fn append_if_valid(&mut self, candidate: Block) -> Result<(), LinkError> {
        check_link(&candidate, self.latest())?;
        self.blocks.push(candidate);
        Ok(())
    }

    /// Replace the whole chain with `candidate` if it is valid and strictly longer.
    pub fn replace_with(&mut self, candidate: Vec<Block>) -> Result<(), ReplaceError> {
        check_chain(&candidate).map_err(ReplaceError::Invalid)?;
        if candidate.len() <= self.blocks.len() {
            return Err(ReplaceError::NotLonger {
                local: self.blocks.len(),
                remote: candidate.len(),
            });
        }
        self.blocks = candidate;
        Ok(())
    }
}

/// Why a replacement candidate was not adopted.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    /// Candidate failed validation.
    #[error("invalid candidate: {0}")]
    Invalid(ChainError),
    /// Candidate is valid but not strictly longer.
    #[error("candidate not longer (local {local}, remote {remote})")]
    NotLonger {
        /// Local length.
        local: usize,
        /// Candidate length.
        remote: usize,
    },
}
