#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Networking: WebSocket gossip, wire codec and peer registry.

pub mod gossip;
pub mod message;
pub mod peers;
