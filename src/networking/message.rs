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

//! Gossip wire codec.
//!
//! ## Format
//! One JSON object per frame:
//!
//! ```text
//! {"type": 0}                                    QUERY_LATEST
//! {"type": 1}                                    QUERY_ALL
//! {"type": 2, "data": "<json-encoded block[]>"}  RESPONSE_BLOCKCHAIN
//! ```
//!
//! `data` is a JSON *string* holding the encoded block array, not a nested array.
//! Existing peers depend on this double encoding.

use crate::core::block::Block;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TYPE_QUERY_LATEST: u8 = 0;
const TYPE_QUERY_ALL: u8 = 1;
const TYPE_RESPONSE_BLOCKCHAIN: u8 = 2;

/// Decoding errors. Any of these drops the frame, never the connection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not a JSON object with a numeric `type`.
    #[error("malformed frame: {0}")]
    Malformed(String),
    /// `type` is not one we know.
    #[error("unknown message type {0}")]
    UnknownType(u64),
    /// `RESPONSE_BLOCKCHAIN` without a `data` string.
    #[error("missing chain payload")]
    MissingData,
    /// `data` is not a JSON-encoded block array.
    #[error("malformed chain payload: {0}")]
    BadChain(String),
    /// `data` decodes to an empty array.
    #[error("empty chain payload")]
    EmptyChain,
    /// Outgoing message could not be encoded.
    #[error("encode: {0}")]
    Encode(String),
}

/// Gossip message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Ask for the peer's tip.
    QueryLatest,
    /// Ask for the peer's whole chain.
    QueryAll,
    /// Tip announcement (one block) or full chain (many).
    ResponseBlockchain(Vec<Block>),
}

#[derive(Serialize, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl Message {
    /// Single-block response carrying `tip`.
    pub fn tip(tip: Block) -> Self {
        Message::ResponseBlockchain(vec![tip])
    }

    /// Encode to the text frame sent on the wire.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        let frame = match self {
            Message::QueryLatest => Frame {
                kind: TYPE_QUERY_LATEST as u64,
                data: None,
            },
            Message::QueryAll => Frame {
                kind: TYPE_QUERY_ALL as u64,
                data: None,
            },
            Message::ResponseBlockchain(blocks) => Frame {
                kind: TYPE_RESPONSE_BLOCKCHAIN as u64,
                data: Some(
                    serde_json::to_string(blocks)
                        .map_err(|e| ProtocolError::Encode(e.to_string()))?,
                ),
            },
        };
        serde_json::to_string(&frame).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Decode one text frame received from a peer.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let frame: Frame =
            serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        match frame.kind {
            k if k == TYPE_QUERY_LATEST as u64 => Ok(Message::QueryLatest),
            k if k == TYPE_QUERY_ALL as u64 => Ok(Message::QueryAll),
            k if k == TYPE_RESPONSE_BLOCKCHAIN as u64 => {
                let data = frame.data.ok_or(ProtocolError::MissingData)?;
                let blocks: Vec<Block> = serde_json::from_str(&data)
                    .map_err(|e| ProtocolError::BadChain(e.to_string()))?;
                if blocks.is_empty() {
                    return Err(ProtocolError::EmptyChain);
                }
                Ok(Message::ResponseBlockchain(blocks))
            }
            other => Err(ProtocolError::UnknownType(other)),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::QueryLatest => "QUERY_LATEST",
            Message::QueryAll => "QUERY_ALL",
            Message::ResponseBlockchain(_) => "RESPONSE_BLOCKCHAIN",
        }
    }
}
