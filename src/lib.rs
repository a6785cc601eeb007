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

//! Memechain - a minimal replicated ledger node.
//!
//! This crate provides:
//! - A hash-chained block model with a fixed, network-wide genesis block
//! - Pure block and chain validation
//! - Longest-valid-chain reconciliation against peer-reported chains
//! - A WebSocket gossip transport and peer registry
//! - An HTTP gateway and Prometheus metrics

/// Block model, validation, builder, reconciliation and configuration.
pub mod core;
/// HTTP gateway.
pub mod http;
/// Observability (metrics).
pub mod monitoring;
/// Gossip transport, wire codec and peer registry.
pub mod networking;
/// The coordinating node owning chain and peers.
pub mod node;
