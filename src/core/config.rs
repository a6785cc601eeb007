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

//! Node configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file,
//! then the `HTTP_PORT`, `P2P_PORT` and `PEERS` environment variables.
//!
//! ```text
//! http_port = 8080
//! p2p_port = 6001
//! bind_host = "0.0.0.0"
//! peers = ["ws://10.0.0.2:6001"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Environment variable naming the optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "MEMECHAIN_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read config file.
    #[error("read config {path}")]
    Read {
        /// File path.
        path: String,
    },
    /// Cannot parse TOML.
    #[error("parse config: {0}")]
    Parse(String),
    /// Port value is not a valid u16.
    #[error("invalid port in {var}: {value:?}")]
    BadPort {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Node configuration root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// HTTP gateway port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Gossip listener port.
    #[serde(default = "default_p2p_port")]
    pub p2p_port: u16,
    /// Interface both listeners bind to.
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    /// Peers to dial at startup (`ws://host:port`).
    #[serde(default)]
    pub peers: Vec<String>,
}

fn default_http_port() -> u16 {
    8080
}

fn default_p2p_port() -> u16 {
    6001
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            p2p_port: default_p2p_port(),
            bind_host: default_bind_host(),
            peers: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|_| ConfigError::Read {
            path: path.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply overrides from a variable lookup (`HTTP_PORT`, `P2P_PORT`, `PEERS`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HTTP_PORT") {
            self.http_port = parse_port("HTTP_PORT", &v)?;
        }
        if let Some(v) = lookup("P2P_PORT") {
            self.p2p_port = parse_port("P2P_PORT", &v)?;
        }
        if let Some(v) = lookup("PEERS") {
            self.peers = parse_peer_list(&v);
        }
        Ok(())
    }

    /// Load from the process environment: optional file, then variable overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        cfg.apply_overrides(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Gossip listen address.
    pub fn p2p_listen_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.p2p_port)
    }

    /// HTTP listen address.
    pub fn http_listen_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }
}

fn parse_port(var: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::BadPort {
        var,
        value: value.to_string(),
    })
}

/// Split a comma-separated peer list, dropping blank entries.
pub fn parse_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
