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

//! Block model, canonical genesis block and the block digest.
//!
//! ## Digest input
//! The digest is SHA-256 over the UTF-8 text
//!
//! ```text
//! <index as decimal><previousHash><data text>[<author>]
//! ```
//!
//! where the data text is the raw contents of a JSON string, or the compact JSON
//! serialization (object keys sorted) of any other value. Every node must produce the
//! same text for the same block, otherwise hashes diverge across the network.
//!
//! Only string and number payloads hash the same as on legacy peers, which coerce the
//! payload by plain string concatenation (`"[object Object]"` for objects, `"1,2"` for
//! arrays). Object and array blocks from those peers fail the hash check here.

use ring::digest::{digest as ring_digest, SHA256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// `previousHash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Network-wide genesis hash. Fixed, not derived from [`digest`].
pub const GENESIS_HASH: &str = "a3e73f3079c231148bc55eac355bc2b0950e2ee4994b5d0bbfb95388c0dd0dfa";

const GENESIS_TITLE: &str = "Rarest Pepe";
const GENESIS_IMAGE_URL: &str = "https://imgur.com/pEMGBhR";

/// A single block. Never mutated once committed to a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain (genesis = 0).
    pub index: u64,
    /// Hash of the parent block, or `"0"` for genesis.
    pub previous_hash: String,
    /// Opaque payload.
    pub data: Value,
    /// Optional author, included in the digest when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Lowercase hex SHA-256 digest of the hashed fields.
    pub hash: String,
    /// Creation time in ms since UNIX epoch. Informational only.
    #[serde(default)]
    pub timestamp: u64,
}

impl Block {
    /// True if this block is the canonical genesis block, field for field.
    ///
    /// `timestamp` is compared too (genesis carries 0). Legacy peers stamp genesis with
    /// their start time, so their full chains never pass this check.
    pub fn is_genesis(&self) -> bool {
        *self == genesis_block()
    }
}

/// The canonical genesis block shared by every node.
pub fn genesis_block() -> Block {
    let mut data = serde_json::Map::new();
    data.insert("title".to_string(), Value::String(GENESIS_TITLE.to_string()));
    data.insert(
        "image_url".to_string(),
        Value::String(GENESIS_IMAGE_URL.to_string()),
    );
    Block {
        index: 0,
        previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        data: Value::Object(data),
        author: None,
        hash: GENESIS_HASH.to_string(),
        timestamp: 0,
    }
}

/// Text form of a payload as it enters the digest.
pub fn data_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Deterministic block digest (lowercase hex SHA-256).
pub fn digest(index: u64, previous_hash: &str, data: &Value, author: Option<&str>) -> String {
    let mut input = String::with_capacity(previous_hash.len() + 64);
    input.push_str(&index.to_string());
    input.push_str(previous_hash);
    input.push_str(&data_text(data));
    if let Some(a) = author {
        input.push_str(a);
    }
    hex::encode(ring_digest(&SHA256, input.as_bytes()).as_ref())
}

/// Recompute the digest of an existing block from its own fields.
pub fn hash_for_block(b: &Block) -> String {
    digest(b.index, &b.previous_hash, &b.data, b.author.as_deref())
}

/// Current wall-clock time in ms since UNIX epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
