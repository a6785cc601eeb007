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

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Index of the local tip.
    pub chain_height: IntGauge,
    /// Connected peers gauge.
    pub peers: IntGauge,
    /// Blocks appended (mined locally or received as a linking tip).
    pub blocks_appended_total: IntCounter,
    /// Wholesale chain replacements.
    pub chain_replaced_total: IntCounter,
    /// Undecodable gossip frames.
    pub invalid_msg_total: IntCounter,
    /// Peer tips or chains refused by validation.
    pub rejected_chains_total: IntCounter,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let chain_height = IntGauge::new("memechain_chain_height", "Index of the local tip")
            .map_err(|_| MetricsError::Prom)?;
        let peers =
            IntGauge::new("memechain_peers", "Connected peers").map_err(|_| MetricsError::Prom)?;
        let blocks_appended_total =
            IntCounter::new("memechain_blocks_appended_total", "Blocks appended")
                .map_err(|_| MetricsError::Prom)?;
        let chain_replaced_total = IntCounter::new(
            "memechain_chain_replaced_total",
            "Local chain replaced by a longer peer chain",
        )
        .map_err(|_| MetricsError::Prom)?;
        let invalid_msg_total =
            IntCounter::new("memechain_invalid_msg_total", "Invalid gossip frames")
                .map_err(|_| MetricsError::Prom)?;
        let rejected_chains_total = IntCounter::new(
            "memechain_rejected_chains_total",
            "Peer blocks or chains that failed validation",
        )
        .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(chain_height.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(peers.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(blocks_appended_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(chain_replaced_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(invalid_msg_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(rejected_chains_total.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            chain_height,
            peers,
            blocks_appended_total,
            chain_replaced_total,
            invalid_msg_total,
            rejected_chains_total,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}
